//! Expression evaluation
//!
//! Walks an [`Expr`] against a [`SeriesCollection`]. Operands are
//! shape-polymorphic at runtime, so the result of any sub-expression is a
//! tagged [`Value`]: a scalar, a date, or a whole series. Binary operators
//! dispatch on the operand shape pair and broadcast over series elementwise;
//! missing days stay missing through every operation.

use crate::expr::ast::{BinaryOp, Expr};
use crate::expr::error::{EvalError, EvalResult};
use crate::expr::functions::SeriesFunction;
use crate::series::{Series, SeriesCollection};
use chrono::NaiveDate;

/// The runtime result of an expression
#[derive(Debug, Clone)]
pub enum Value {
    /// A scalar
    Number(f64),
    /// A calendar day, produced by the date-valued statistics
    Date(NaiveDate),
    /// A whole series, produced by `dataset()`, broadcasts and `normalize`
    Series(Series),
}

/// Evaluate an expression over a collection
pub fn evaluate(expr: &Expr, collection: &SeriesCollection) -> EvalResult<Value> {
    match expr {
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::Neg(inner) => match evaluate(inner, collection)? {
            Value::Number(n) => Ok(Value::Number(-n)),
            Value::Series(s) => Ok(Value::Series(s.map_values(|v| -v))),
            Value::Date(_) => Err(EvalError::InvalidOperands {
                op: "-".to_string(),
            }),
        },
        Expr::Binary { op, lhs, rhs } => {
            let lhs = evaluate(lhs, collection)?;
            let rhs = evaluate(rhs, collection)?;
            apply_binary(*op, lhs, rhs)
        }
        Expr::Call { name, args } => evaluate_call(name, args, collection),
    }
}

/// Dispatch a binary operator on the runtime shapes of its operands
fn apply_binary(op: BinaryOp, lhs: Value, rhs: Value) -> EvalResult<Value> {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(op.apply(a, b))),
        (Value::Number(a), Value::Series(s)) => {
            Ok(Value::Series(s.map_values(|v| op.apply(a, v))))
        }
        (Value::Series(s), Value::Number(b)) => {
            Ok(Value::Series(s.map_values(|v| op.apply(v, b))))
        }
        (Value::Series(a), Value::Series(b)) => {
            Ok(Value::Series(a.zip_values(&b, |x, y| op.apply(x, y))))
        }
        // Dates only flow into templates, never through arithmetic
        _ => Err(EvalError::InvalidOperands { op: op.to_string() }),
    }
}

/// Resolve a call: the `dataset(id)` selector or a library function
fn evaluate_call(name: &str, args: &[Expr], collection: &SeriesCollection) -> EvalResult<Value> {
    if name == "dataset" {
        if args.len() != 1 {
            return Err(EvalError::Arity {
                function: name.to_string(),
                expected: "1",
                got: args.len(),
            });
        }
        let id = match evaluate(&args[0], collection)? {
            Value::Number(n) if n >= 0.0 && n.fract() == 0.0 => n as usize,
            _ => return Err(EvalError::InvalidDatasetId),
        };
        return collection
            .series_by_id(id)
            .cloned()
            .map(Value::Series)
            .ok_or(EvalError::UnknownDataset(id));
    }

    let function =
        SeriesFunction::from_name(name).ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?;

    // Zero args: the first series not flagged x-axis-only. One arg: the
    // explicitly named series.
    let series = match args {
        [] => collection
            .first_value_series()
            .cloned()
            .ok_or(EvalError::NoDefaultSeries)?,
        [arg] => match evaluate(arg, collection)? {
            Value::Series(s) => s,
            _ => {
                return Err(EvalError::InvalidArgument {
                    function: name.to_string(),
                })
            }
        },
        _ => {
            return Err(EvalError::Arity {
                function: name.to_string(),
                expected: "0 or 1",
                got: args.len(),
            })
        }
    };

    function.apply(&series)
}
