//! Expression interpreter.
//!
//! The interpreter only reaches the outside world through [`ExprContext`],
//! which exposes a fixed set of queries about the battler under test and
//! the game world. There is no way to call arbitrary host code.

use serde::{Deserialize, Serialize};

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::error::{ExprError, Result};

/// A runtime value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    Int(i64),
    Bool(bool),
}

impl Value {
    fn type_name(self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Bool(_) => "boolean",
        }
    }

    /// Get as integer, failing for booleans.
    pub fn as_int(self) -> Result<i64> {
        match self {
            Value::Int(v) => Ok(v),
            Value::Bool(_) => Err(ExprError::TypeMismatch {
                expected: "integer",
                found: self.type_name(),
            }),
        }
    }

    /// Truthiness: booleans are themselves, integers are true when non-zero.
    #[must_use]
    pub fn truthy(self) -> bool {
        match self {
            Value::Int(v) => v != 0,
            Value::Bool(b) => b,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

/// Queries available to expressions.
///
/// Implemented by the engine for a battler in its world; tests implement
/// it directly.
pub trait ExprContext {
    /// Named numeric value (`level`, `hp`, `mhp`, `atk`, custom stats).
    fn stat(&self, name: &str) -> Option<i64>;

    /// Is the state currently applied?
    fn has_state(&self, state_id: u32) -> bool;

    /// Could the state be applied right now?
    fn state_addable(&self, state_id: u32) -> bool;

    /// Game switch value.
    fn switch(&self, switch_id: u32) -> bool;

    /// Game variable value.
    fn variable(&self, variable_id: u32) -> i64;

    /// Random integer in `0..n`.
    fn rand(&mut self, n: i64) -> i64;
}

/// Evaluate an expression to a value.
pub fn evaluate(expr: &Expr, ctx: &mut dyn ExprContext) -> Result<Value> {
    match expr {
        Expr::Int(v) => Ok(Value::Int(*v)),

        Expr::Bool(v) => Ok(Value::Bool(*v)),

        Expr::Ident(name) => ctx
            .stat(name)
            .map(Value::Int)
            .ok_or_else(|| ExprError::UnknownIdentifier(name.clone())),

        Expr::Call { name, args } => call(name, args, ctx),

        Expr::Index { target, index } => {
            let id = id_arg(evaluate(index, ctx)?)?;
            match target.as_str() {
                "$game_switches" | "switches" => Ok(Value::Bool(ctx.switch(id))),
                "$game_variables" | "variables" => Ok(Value::Int(ctx.variable(id))),
                _ => Err(ExprError::UnknownIdentifier(target.clone())),
            }
        }

        Expr::Unary { op, operand } => {
            let value = evaluate(operand, ctx)?;
            match op {
                UnaryOp::Not => Ok(Value::Bool(!value.truthy())),
                UnaryOp::Neg => value
                    .as_int()?
                    .checked_neg()
                    .map(Value::Int)
                    .ok_or(ExprError::Overflow),
            }
        }

        Expr::Binary { op, lhs, rhs } => binary(*op, lhs, rhs, ctx),

        Expr::Conditional {
            condition,
            then,
            otherwise,
        } => {
            if evaluate(condition, ctx)?.truthy() {
                evaluate(then, ctx)
            } else {
                evaluate(otherwise, ctx)
            }
        }
    }
}

/// Evaluate an expression and reduce it to a boolean.
pub fn evaluate_bool(expr: &Expr, ctx: &mut dyn ExprContext) -> Result<bool> {
    evaluate(expr, ctx).map(Value::truthy)
}

/// Evaluate an expression that must produce an integer.
pub fn evaluate_int(expr: &Expr, ctx: &mut dyn ExprContext) -> Result<i64> {
    evaluate(expr, ctx)?.as_int()
}

fn binary(op: BinaryOp, lhs: &Expr, rhs: &Expr, ctx: &mut dyn ExprContext) -> Result<Value> {
    // Short-circuit forms evaluate the right side lazily so that
    // `rand()` draws happen only when reached.
    match op {
        BinaryOp::And => {
            if !evaluate(lhs, ctx)?.truthy() {
                return Ok(Value::Bool(false));
            }
            return Ok(Value::Bool(evaluate(rhs, ctx)?.truthy()));
        }
        BinaryOp::Or => {
            if evaluate(lhs, ctx)?.truthy() {
                return Ok(Value::Bool(true));
            }
            return Ok(Value::Bool(evaluate(rhs, ctx)?.truthy()));
        }
        _ => {}
    }

    let left = evaluate(lhs, ctx)?;
    let right = evaluate(rhs, ctx)?;

    match op {
        BinaryOp::Eq => return Ok(Value::Bool(values_equal(left, right)?)),
        BinaryOp::Ne => return Ok(Value::Bool(!values_equal(left, right)?)),
        _ => {}
    }

    let a = left.as_int()?;
    let b = right.as_int()?;

    let value = match op {
        BinaryOp::Add => Value::Int(a.checked_add(b).ok_or(ExprError::Overflow)?),
        BinaryOp::Sub => Value::Int(a.checked_sub(b).ok_or(ExprError::Overflow)?),
        BinaryOp::Mul => Value::Int(a.checked_mul(b).ok_or(ExprError::Overflow)?),
        BinaryOp::Div => Value::Int(floor_div(a, b)?),
        BinaryOp::Rem => Value::Int(floor_rem(a, b)?),
        BinaryOp::Lt => Value::Bool(a < b),
        BinaryOp::Le => Value::Bool(a <= b),
        BinaryOp::Gt => Value::Bool(a > b),
        BinaryOp::Ge => Value::Bool(a >= b),
        BinaryOp::Eq | BinaryOp::Ne | BinaryOp::And | BinaryOp::Or => unreachable!("handled above"),
    };
    Ok(value)
}

fn values_equal(left: Value, right: Value) -> Result<bool> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(a == b),
        (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
        (a, b) => Err(ExprError::TypeMismatch {
            expected: a.type_name(),
            found: b.type_name(),
        }),
    }
}

/// Integer division rounding toward negative infinity.
pub(crate) fn floor_div(a: i64, b: i64) -> Result<i64> {
    if b == 0 {
        return Err(ExprError::DivisionByZero);
    }
    let q = a.checked_div(b).ok_or(ExprError::Overflow)?;
    if (a % b != 0) && ((a < 0) != (b < 0)) {
        Ok(q - 1)
    } else {
        Ok(q)
    }
}

/// Remainder with the sign of the divisor, matching `floor_div`.
pub(crate) fn floor_rem(a: i64, b: i64) -> Result<i64> {
    if b == 0 {
        return Err(ExprError::DivisionByZero);
    }
    let r = a.checked_rem(b).ok_or(ExprError::Overflow)?;
    if r != 0 && ((r < 0) != (b < 0)) {
        Ok(r + b)
    } else {
        Ok(r)
    }
}

fn id_arg(value: Value) -> Result<u32> {
    let raw = value.as_int()?;
    u32::try_from(raw).map_err(|_| ExprError::Overflow)
}

fn expect_args(name: &str, args: &[Expr], expected: usize) -> Result<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(ExprError::Arity {
            name: name.to_string(),
            expected,
            got: args.len(),
        })
    }
}

fn call(name: &str, args: &[Expr], ctx: &mut dyn ExprContext) -> Result<Value> {
    match name {
        "state?" | "has_state" => {
            expect_args(name, args, 1)?;
            let id = id_arg(evaluate(&args[0], ctx)?)?;
            Ok(Value::Bool(ctx.has_state(id)))
        }
        "state_addable?" | "state_addable" => {
            expect_args(name, args, 1)?;
            let id = id_arg(evaluate(&args[0], ctx)?)?;
            Ok(Value::Bool(ctx.state_addable(id)))
        }
        "switch" => {
            expect_args(name, args, 1)?;
            let id = id_arg(evaluate(&args[0], ctx)?)?;
            Ok(Value::Bool(ctx.switch(id)))
        }
        "variable" => {
            expect_args(name, args, 1)?;
            let id = id_arg(evaluate(&args[0], ctx)?)?;
            Ok(Value::Int(ctx.variable(id)))
        }
        "rand" => {
            expect_args(name, args, 1)?;
            let n = evaluate_int(&args[0], ctx)?;
            Ok(Value::Int(ctx.rand(n)))
        }
        "min" | "max" => {
            expect_args(name, args, 2)?;
            let a = evaluate_int(&args[0], ctx)?;
            let b = evaluate_int(&args[1], ctx)?;
            Ok(Value::Int(if name == "min" { a.min(b) } else { a.max(b) }))
        }
        "abs" => {
            expect_args(name, args, 1)?;
            evaluate_int(&args[0], ctx)?
                .checked_abs()
                .map(Value::Int)
                .ok_or(ExprError::Overflow)
        }
        _ => Err(ExprError::UnknownFunction(name.to_string())),
    }
}
