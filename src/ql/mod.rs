//! Annotation Graph Query Language (AGQL).
//!
//! AGQL is a small boolean/relational language for selecting transcripts and
//! participants by the annotations on their layers:
//!
//! - **Layer functions**: `my('L').label`, `list('L').length`, `labels('L')`,
//!   `annotators('L')`
//! - **Root identifiers**: `id`, `label`, `ordinal`
//! - **Comparisons**: `=`, `<>`, `<`, `>`, `<=`, `>=`, `MATCHES`, `NOT MATCHES`,
//!   `IN`, `NOT IN`
//! - **Connectives**: `AND`, `OR`, `NOT`, parentheses
//!
//! # Example
//!
//! ```
//! use agql::ql;
//!
//! let result = ql::parse_filter("my('corpus').label = 'CC' AND 'bell' IN labels('noise')");
//! assert!(result.is_ok());
//!
//! let result = ql::parse_order("my('corpus').label ASC, ordinal DESC");
//! assert_eq!(result.output.map(|terms| terms.len()), Some(2));
//! ```

pub mod ast;
pub mod escape;
pub mod lexer;
pub mod parser;
pub mod span;

pub use ast::*;
pub use escape::{esc, is_quotable, quote};
pub use span::{Span, Spanned};

use chumsky::error::Rich;
use chumsky::input::Input;
use chumsky::span::SimpleSpan;
use chumsky::Parser as _;

/// Result of parsing an AGQL expression.
#[derive(Debug)]
pub struct ParseResult<T> {
    /// The parsed output, if parsing succeeded.
    pub output: Option<T>,
    /// Syntax errors, in source order.
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> ParseResult<T> {
    /// Returns true if parsing succeeded without errors.
    pub fn is_ok(&self) -> bool {
        self.output.is_some() && !self.has_errors()
    }

    /// Returns true if there are any errors.
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// A syntax error with source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// The span in the source where the error applies.
    pub span: Span,
    /// The error message.
    pub message: String,
}

impl Diagnostic {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (at {:?})", self.message, self.span)
    }
}

/// Lex `source`, returning the tokens or the lexer diagnostics.
fn tokenize(source: &str) -> Result<Vec<(lexer::Token<'_>, SimpleSpan)>, Vec<Diagnostic>> {
    let (tokens, lex_errs) = lexer::lexer().parse(source).into_output_errors();

    let diagnostics: Vec<Diagnostic> = lex_errs
        .into_iter()
        .map(|e: Rich<'_, char>| {
            let span = e.span();
            Diagnostic::new(span.start..span.end, e.to_string())
        })
        .collect();

    match tokens {
        Some(tokens) if diagnostics.is_empty() => Ok(tokens),
        _ => Err(diagnostics),
    }
}

fn parse_diagnostics(errs: Vec<Rich<'_, lexer::Token<'_>, SimpleSpan>>) -> Vec<Diagnostic> {
    errs.into_iter()
        .map(|e| {
            let span = e.span();
            Diagnostic::new(span.start..span.end, e.to_string())
        })
        .collect()
}

/// Parse a filter expression.
///
/// A blank expression parses successfully to `Some(None)`: no condition.
pub fn parse_filter(source: &str) -> ParseResult<Option<Spanned<Expr>>> {
    let tokens = match tokenize(source) {
        Ok(tokens) => tokens,
        Err(diagnostics) => {
            return ParseResult {
                output: None,
                diagnostics,
            }
        }
    };

    let len = source.len();
    let eoi: SimpleSpan = (len..len).into();
    let token_stream = tokens.as_slice().map(
        eoi,
        |(tok, span): &(lexer::Token<'_>, SimpleSpan)| (tok, span),
    );

    let (output, errs) = parser::filter_parser()
        .parse(token_stream)
        .into_output_errors();

    ParseResult {
        output,
        diagnostics: parse_diagnostics(errs),
    }
}

/// Parse an order expression.
///
/// A blank expression parses successfully to an empty term list.
pub fn parse_order(source: &str) -> ParseResult<Vec<OrderTerm>> {
    let tokens = match tokenize(source) {
        Ok(tokens) => tokens,
        Err(diagnostics) => {
            return ParseResult {
                output: None,
                diagnostics,
            }
        }
    };

    let len = source.len();
    let eoi: SimpleSpan = (len..len).into();
    let token_stream = tokens.as_slice().map(
        eoi,
        |(tok, span): &(lexer::Token<'_>, SimpleSpan)| (tok, span),
    );

    let (output, errs) = parser::order_parser()
        .parse(token_stream)
        .into_output_errors();

    ParseResult {
        output,
        diagnostics: parse_diagnostics(errs),
    }
}
