//! Expression Parser
//!
//! Parses the template expression language into an [`Expr`] AST.
//!
//! # Supported Syntax
//!
//! ```text
//! expression := term (('+' | '-') term)*
//! term       := factor (('*' | '/' | '%') factor)*
//! factor     := '(' expression ')' | number | name '(' args ')' | '-' factor
//! ```
//!
//! `*`, `/` and `%` bind tighter than `+` and `-`; same-level operators are
//! left-associative.
//!
//! # Examples
//!
//! ```text
//! sum(dataset(0))
//! 2 * dataset(0) + 1
//! average() :: handled by the template layer, not here
//! ```

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, digit1, multispace0},
    combinator::{map, map_res, opt, recognize, value},
    multi::{fold_many0, separated_list0},
    sequence::{delimited, pair, preceded},
    IResult,
};

use crate::expr::ast::{BinaryOp, Expr};
use crate::expr::error::{EvalError, EvalResult};

/// Parse an expression string into an AST
///
/// The whole input must be consumed; trailing text is a parse error.
pub fn parse_expression(input: &str) -> EvalResult<Expr> {
    let input = input.trim();

    match parse_additive(input) {
        Ok((remaining, expr)) => {
            if remaining.trim().is_empty() {
                Ok(expr)
            } else {
                Err(EvalError::Parse(format!(
                    "unexpected input after expression: '{}'",
                    remaining.trim()
                )))
            }
        }
        Err(e) => Err(EvalError::Parse(format!("{:?}", e))),
    }
}

/// Parse `+` and `-` chains (lowest precedence, left-associative)
fn parse_additive(input: &str) -> IResult<&str, Expr> {
    let (input, init) = parse_term(input)?;

    fold_many0(
        pair(
            delimited(
                multispace0,
                alt((
                    value(BinaryOp::Add, char('+')),
                    value(BinaryOp::Sub, char('-')),
                )),
                multispace0,
            ),
            parse_term,
        ),
        move || init.clone(),
        |lhs, (op, rhs)| Expr::binary(op, lhs, rhs),
    )(input)
}

/// Parse `*`, `/` and `%` chains
fn parse_term(input: &str) -> IResult<&str, Expr> {
    let (input, init) = parse_factor(input)?;

    fold_many0(
        pair(
            delimited(
                multispace0,
                alt((
                    value(BinaryOp::Mul, char('*')),
                    value(BinaryOp::Div, char('/')),
                    value(BinaryOp::Mod, char('%')),
                )),
                multispace0,
            ),
            parse_factor,
        ),
        move || init.clone(),
        |lhs, (op, rhs)| Expr::binary(op, lhs, rhs),
    )(input)
}

/// Parse a single operand
fn parse_factor(input: &str) -> IResult<&str, Expr> {
    preceded(
        multispace0,
        alt((parse_paren, parse_number, parse_call, parse_neg)),
    )(input)
}

/// Parse a parenthesized sub-expression
fn parse_paren(input: &str) -> IResult<&str, Expr> {
    delimited(
        char('('),
        parse_additive,
        preceded(multispace0, char(')')),
    )(input)
}

/// Parse an unsigned numeric literal; signs are handled as unary minus
fn parse_number(input: &str) -> IResult<&str, Expr> {
    map(
        map_res(
            recognize(pair(digit1, opt(pair(char('.'), digit1)))),
            |s: &str| s.parse::<f64>(),
        ),
        Expr::Number,
    )(input)
}

/// Parse a call expression like `sum(dataset(0))`
fn parse_call(input: &str) -> IResult<&str, Expr> {
    let (input, name) = parse_identifier(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char('(')(input)?;
    let (input, args) = separated_list0(
        delimited(multispace0, char(','), multispace0),
        parse_additive,
    )(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char(')')(input)?;

    Ok((input, Expr::call(name, args)))
}

/// Parse a unary minus
fn parse_neg(input: &str) -> IResult<&str, Expr> {
    map(
        preceded(pair(char('-'), multispace0), parse_factor),
        |inner| Expr::Neg(Box::new(inner)),
    )(input)
}

/// Parse a function name (camelCase identifiers included)
fn parse_identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_literal() {
        assert_eq!(parse_expression("42").unwrap(), Expr::Number(42.0));
        assert_eq!(parse_expression(" 3.25 ").unwrap(), Expr::Number(3.25));
    }

    #[test]
    fn test_parse_negative_literal() {
        assert_eq!(
            parse_expression("-7").unwrap(),
            Expr::Neg(Box::new(Expr::Number(7.0)))
        );
    }

    #[test]
    fn test_precedence() {
        // 1 + 2 * 3 parses as 1 + (2 * 3)
        assert_eq!(
            parse_expression("1 + 2 * 3").unwrap(),
            Expr::binary(
                BinaryOp::Add,
                Expr::Number(1.0),
                Expr::binary(BinaryOp::Mul, Expr::Number(2.0), Expr::Number(3.0)),
            )
        );
    }

    #[test]
    fn test_left_associativity() {
        // 10 - 3 - 2 parses as (10 - 3) - 2
        assert_eq!(
            parse_expression("10 - 3 - 2").unwrap(),
            Expr::binary(
                BinaryOp::Sub,
                Expr::binary(BinaryOp::Sub, Expr::Number(10.0), Expr::Number(3.0)),
                Expr::Number(2.0),
            )
        );
    }

    #[test]
    fn test_parentheses_override_precedence() {
        assert_eq!(
            parse_expression("(1 + 2) * 3").unwrap(),
            Expr::binary(
                BinaryOp::Mul,
                Expr::binary(BinaryOp::Add, Expr::Number(1.0), Expr::Number(2.0)),
                Expr::Number(3.0),
            )
        );
    }

    #[test]
    fn test_parse_modulo() {
        assert_eq!(
            parse_expression("7 % 2").unwrap(),
            Expr::binary(BinaryOp::Mod, Expr::Number(7.0), Expr::Number(2.0))
        );
    }

    #[test]
    fn test_parse_call_without_args() {
        assert_eq!(
            parse_expression("maxStreak()").unwrap(),
            Expr::call("maxStreak", vec![])
        );
        assert_eq!(
            parse_expression("sum(  )").unwrap(),
            Expr::call("sum", vec![])
        );
    }

    #[test]
    fn test_parse_nested_call() {
        assert_eq!(
            parse_expression("sum(dataset(0))").unwrap(),
            Expr::call("sum", vec![Expr::call("dataset", vec![Expr::Number(0.0)])])
        );
    }

    #[test]
    fn test_parse_call_in_arithmetic() {
        assert_eq!(
            parse_expression("2 * dataset(0)").unwrap(),
            Expr::binary(
                BinaryOp::Mul,
                Expr::Number(2.0),
                Expr::call("dataset", vec![Expr::Number(0.0)]),
            )
        );
    }

    #[test]
    fn test_parse_multiple_args() {
        assert_eq!(
            parse_expression("f(1, 2, 3)").unwrap(),
            Expr::call(
                "f",
                vec![Expr::Number(1.0), Expr::Number(2.0), Expr::Number(3.0)]
            )
        );
    }

    #[test]
    fn test_trailing_input_rejected() {
        assert!(matches!(
            parse_expression("1 + 2 extra"),
            Err(EvalError::Parse(_))
        ));
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(parse_expression(""), Err(EvalError::Parse(_))));
        assert!(matches!(parse_expression("   "), Err(EvalError::Parse(_))));
    }

    #[test]
    fn test_unbalanced_parens_rejected() {
        assert!(matches!(
            parse_expression("(1 + 2"),
            Err(EvalError::Parse(_))
        ));
    }
}
