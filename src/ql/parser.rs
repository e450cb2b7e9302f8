//! Parser for AGQL using chumsky.
//!
//! Two entry points share one operand grammar: [`filter_parser`] for boolean
//! expressions and [`order_parser`] for comma-separated order terms.
//! Precedence, loosest first, is `OR`, `AND`, `NOT`, then comparisons.

use chumsky::input::ValueInput;
use chumsky::prelude::*;

use super::ast::*;
use super::lexer::Token;
use super::span::{Span, Spanned};

type ParserError<'tokens, 'src> = extra::Err<Rich<'tokens, Token<'src>, SimpleSpan>>;

/// Convert a SimpleSpan to our Span type (Range<usize>)
fn to_span(span: SimpleSpan) -> Span {
    span.start..span.end
}

/// Strip the escape from `\"` inside a double-quoted string.
fn unescape_double(s: &str) -> String {
    s.replace("\\\"", "\"")
}

/// Operands: layer functions, member access, bare identifiers and literals.
fn operand<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, Spanned<Operand>, ParserError<'tokens, 'src>> + Clone
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
{
    // ==========================================================================
    // Basic token parsers
    // ==========================================================================

    let string = select! {
        Token::SingleQuoted(s) => s.to_string(),
        Token::DoubleQuoted(s) => unescape_double(s),
    }
    .labelled("string literal");

    let number = select! {
        Token::Number(n) => n.to_string(),
    }
    .labelled("number");

    let ident = select! {
        Token::Ident(s) => s.to_string(),
    }
    .labelled("identifier");

    let literal = string
        .clone()
        .map(Literal::String)
        .or(number.map(Literal::Number))
        .map(Operand::Literal);

    // ('layer id')
    let layer_arg = string
        .map_with(|s, e| Spanned::new(s, to_span(e.span())))
        .delimited_by(just(Token::LParen), just(Token::RParen));

    // ==========================================================================
    // Layer functions
    // ==========================================================================

    let my = just(Token::Ident("my"))
        .ignore_then(layer_arg.clone())
        .then_ignore(just(Token::Dot))
        .then(choice((
            just(Token::Ident("label")).to(LayerFunction::Label),
            just(Token::Ident("id")).to(LayerFunction::Id),
        )))
        .map(|(layer_id, function)| Operand::Layer { function, layer_id });

    let list = just(Token::Ident("list"))
        .ignore_then(layer_arg.clone())
        .then_ignore(just(Token::Dot))
        .then_ignore(just(Token::Ident("length")))
        .map(|layer_id| Operand::Layer {
            function: LayerFunction::Count,
            layer_id,
        });

    let labels = just(Token::Ident("labels"))
        .ignore_then(layer_arg.clone())
        .then(
            just(Token::Dot)
                .then(just(Token::Ident("length")))
                .or_not(),
        )
        .map(|(layer_id, length)| Operand::Layer {
            function: if length.is_some() {
                LayerFunction::Count
            } else {
                LayerFunction::Labels
            },
            layer_id,
        });

    let annotators = just(Token::Ident("annotators"))
        .ignore_then(layer_arg)
        .map(|layer_id| Operand::Layer {
            function: LayerFunction::Annotators,
            layer_id,
        });

    // ==========================================================================
    // Identifiers
    // ==========================================================================

    // layer.label / layer.id / anything.member
    let member = ident
        .clone()
        .map_with(|s, e| Spanned::new(s, to_span(e.span())))
        .then_ignore(just(Token::Dot))
        .then(
            ident
                .clone()
                .map_with(|s, e| Spanned::new(s, to_span(e.span()))),
        )
        .map(|(object, member)| match member.value.as_str() {
            "label" => Operand::Layer {
                function: LayerFunction::Label,
                layer_id: object,
            },
            "id" => Operand::Layer {
                function: LayerFunction::Id,
                layer_id: object,
            },
            _ => Operand::Member { object, member },
        });

    let bare = ident.map(|s| match s.as_str() {
        "id" => Operand::Id,
        "label" => Operand::Label,
        "ordinal" => Operand::Ordinal,
        _ => Operand::Identifier(s),
    });

    choice((my, list, labels, annotators, member, bare, literal))
        .map_with(|op, e| Spanned::new(op, to_span(e.span())))
        .labelled("operand")
}

/// Create the filter parser.
///
/// Accepts an empty token stream, producing `None`.
pub fn filter_parser<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, Option<Spanned<Expr>>, ParserError<'tokens, 'src>>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
{
    let operand = operand();

    let compare_op = choice((
        just(Token::Eq).to(CompareOp::Eq),
        just(Token::Ne).to(CompareOp::Ne),
        just(Token::Le).to(CompareOp::Le),
        just(Token::Ge).to(CompareOp::Ge),
        just(Token::Lt).to(CompareOp::Lt),
        just(Token::Gt).to(CompareOp::Gt),
        just(Token::Matches).to(CompareOp::Matches),
        just(Token::Not)
            .then(just(Token::Matches))
            .to(CompareOp::NotMatches),
        just(Token::Not).then(just(Token::In)).to(CompareOp::NotIn),
        just(Token::In).to(CompareOp::In),
    ))
    .map_with(|op, e| Spanned::new(op, to_span(e.span())))
    .labelled("comparison operator");

    // ('a', "b", 3) as the right side of IN
    let list = operand
        .clone()
        .separated_by(just(Token::Comma))
        .at_least(1)
        .collect::<Vec<_>>()
        .delimited_by(just(Token::LParen), just(Token::RParen))
        .map_with(|items, e| Spanned::new(Operand::List(items), to_span(e.span())));

    let rhs = list.or(operand.clone());

    let expr = recursive(|expr| {
        let group = expr
            .delimited_by(just(Token::LParen), just(Token::RParen))
            .map(|inner| Expr::Group(Box::new(inner)))
            .recover_with(via_parser(nested_delimiters(
                Token::LParen,
                Token::RParen,
                [],
                |_| Expr::Error,
            )));

        let predicate = operand
            .clone()
            .then(compare_op.then(rhs).or_not())
            .map(|(lhs, tail)| match tail {
                Some((op, rhs)) => Expr::Compare { lhs, op, rhs },
                None => Expr::Operand(lhs),
            });

        // A malformed term is skipped up to the next connective so the
        // terms around it are still compiled.
        let skipped = any()
            .and_is(one_of([Token::And, Token::Or, Token::RParen]).not())
            .repeated()
            .at_least(1)
            .to(Expr::Error);

        let atom = group
            .or(predicate)
            .recover_with(via_parser(skipped))
            .map_with(|expr, e| Spanned::new(expr, to_span(e.span())));

        let unary = recursive(|unary| {
            just(Token::Not)
                .ignore_then(unary)
                .map_with(|inner, e| {
                    Spanned::new(Expr::Not(Box::new(inner)), to_span(e.span()))
                })
                .or(atom)
        });

        let and = unary.clone().foldl(
            just(Token::And).ignore_then(unary).repeated(),
            |lhs: Spanned<Expr>, rhs: Spanned<Expr>| {
                let span = lhs.span.start..rhs.span.end;
                Spanned::new(Expr::And(Box::new(lhs), Box::new(rhs)), span)
            },
        );

        and.clone().foldl(
            just(Token::Or).ignore_then(and).repeated(),
            |lhs: Spanned<Expr>, rhs: Spanned<Expr>| {
                let span = lhs.span.start..rhs.span.end;
                Spanned::new(Expr::Or(Box::new(lhs), Box::new(rhs)), span)
            },
        )
    });

    expr.or_not().then_ignore(trailing()).then_ignore(end())
}

/// Tokens left over after a complete expression. Reported as one error and
/// skipped, so the expression before them still comes through.
fn trailing<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, (), ParserError<'tokens, 'src>> + Clone
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
{
    any()
        .repeated()
        .at_least(1)
        .validate(|(), e, emitter| {
            emitter.emit(Rich::custom(e.span(), "unexpected input after expression"))
        })
        .or_not()
        .ignored()
}

/// Create the order parser: `operand [ASC|DESC] (, operand [ASC|DESC])*`.
pub fn order_parser<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, Vec<OrderTerm>, ParserError<'tokens, 'src>>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
{
    let direction = choice((just(Token::Asc).to(false), just(Token::Desc).to(true)));

    operand()
        .then(direction.or_not())
        .map(|(operand, descending)| OrderTerm {
            operand,
            descending: descending.unwrap_or(false),
        })
        .separated_by(just(Token::Comma))
        .collect::<Vec<_>>()
        .then_ignore(trailing())
        .then_ignore(end())
}
