//! Lexer for AGQL.
//!
//! Converts an expression into a sequence of tokens with span information.
//! Keywords are case-insensitive; identifiers and string contents are
//! borrowed from the source.

use chumsky::prelude::*;

/// A token in an AGQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'src> {
    // ========================================================================
    // Keywords
    // ========================================================================
    And,
    Or,
    Not,
    In,
    Matches,
    Asc,
    Desc,

    // ========================================================================
    // Literals
    // ========================================================================
    /// An identifier (not a keyword). Function names such as `my` and
    /// `labels` are identifiers; the parser gives them meaning.
    Ident(&'src str),
    /// A single-quoted string (contents without quotes, escapes intact).
    SingleQuoted(&'src str),
    /// A double-quoted string (contents without quotes, escapes intact).
    DoubleQuoted(&'src str),
    /// An integer or decimal number, optionally negative.
    Number(&'src str),

    // ========================================================================
    // Symbols
    // ========================================================================
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `=`
    Eq,
    /// `<>`
    Ne,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Le,
    /// `>=`
    Ge,
}

impl<'src> std::fmt::Display for Token<'src> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::And => write!(f, "AND"),
            Token::Or => write!(f, "OR"),
            Token::Not => write!(f, "NOT"),
            Token::In => write!(f, "IN"),
            Token::Matches => write!(f, "MATCHES"),
            Token::Asc => write!(f, "ASC"),
            Token::Desc => write!(f, "DESC"),

            Token::Ident(s) => write!(f, "{}", s),
            Token::SingleQuoted(s) => write!(f, "'{}'", s),
            Token::DoubleQuoted(s) => write!(f, "\"{}\"", s),
            Token::Number(s) => write!(f, "{}", s),

            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Dot => write!(f, "."),
            Token::Eq => write!(f, "="),
            Token::Ne => write!(f, "<>"),
            Token::Lt => write!(f, "<"),
            Token::Gt => write!(f, ">"),
            Token::Le => write!(f, "<="),
            Token::Ge => write!(f, ">="),
        }
    }
}

/// Map an identifier string to a keyword token or return Ident.
fn keyword_or_ident(s: &str) -> Token<'_> {
    match s.to_ascii_uppercase().as_str() {
        "AND" => Token::And,
        "OR" => Token::Or,
        "NOT" => Token::Not,
        "IN" => Token::In,
        "MATCHES" => Token::Matches,
        "ASC" => Token::Asc,
        "DESC" => Token::Desc,
        _ => Token::Ident(s),
    }
}

/// Create the AGQL lexer.
pub fn lexer<'src>(
) -> impl Parser<'src, &'src str, Vec<(Token<'src>, SimpleSpan)>, extra::Err<Rich<'src, char>>> {
    let ident = text::ident().map(keyword_or_ident);

    // Quoted strings keep their backslash escapes; a backslash always
    // consumes the following character so `\'` never ends the literal.
    let single_quoted = just('\'')
        .ignore_then(
            choice((
                just('\\').then(any()).ignored(),
                none_of("\\'").ignored(),
            ))
            .repeated()
            .to_slice(),
        )
        .then_ignore(just('\''))
        .map(Token::SingleQuoted);

    let double_quoted = just('"')
        .ignore_then(
            choice((
                just('\\').then(any()).ignored(),
                none_of("\\\"").ignored(),
            ))
            .repeated()
            .to_slice(),
        )
        .then_ignore(just('"'))
        .map(Token::DoubleQuoted);

    let number = just('-')
        .or_not()
        .then(text::digits(10))
        .then(just('.').then(text::digits(10)).or_not())
        .to_slice()
        .map(Token::Number);

    // Multi-char symbols first
    let symbol = choice((
        just("<=").to(Token::Le),
        just(">=").to(Token::Ge),
        just("<>").to(Token::Ne),
        just('<').to(Token::Lt),
        just('>').to(Token::Gt),
        just('=').to(Token::Eq),
        just('(').to(Token::LParen),
        just(')').to(Token::RParen),
        just(',').to(Token::Comma),
        just('.').to(Token::Dot),
    ));

    let token = choice((ident, single_quoted, double_quoted, number, symbol))
        .map_with(|tok, e| (tok, e.span()));

    token
        .padded()
        .repeated()
        .collect()
        .padded()
        .then_ignore(end())
}

/// Lex a source string into tokens.
///
/// Returns Ok with the token list on success, or Err with the lex errors.
pub fn lex(source: &str) -> Result<Vec<(Token<'_>, SimpleSpan)>, Vec<Rich<'_, char>>> {
    let (tokens, errs) = lexer().parse(source).into_output_errors();
    if errs.is_empty() {
        Ok(tokens.unwrap_or_default())
    } else {
        Err(errs)
    }
}
