//! Condition expression language.
//!
//! Notetags embed small boolean and arithmetic expressions:
//! `rand(100) < 30`, `state?(1) || state?(2)`, `1 + level / 5`. Instead of
//! handing these to a general-purpose evaluator, they are parsed into a
//! small AST and interpreted against an [`ExprContext`], which exposes a
//! fixed whitelist of queries.
//!
//! ## Example
//!
//! ```
//! use battler_rules::expr::{self, ExprContext, Value};
//!
//! struct Hero { level: i64 }
//!
//! impl ExprContext for Hero {
//!     fn stat(&self, name: &str) -> Option<i64> {
//!         (name == "level").then_some(self.level)
//!     }
//!     fn has_state(&self, _: u32) -> bool { false }
//!     fn state_addable(&self, _: u32) -> bool { true }
//!     fn switch(&self, _: u32) -> bool { false }
//!     fn variable(&self, _: u32) -> i64 { 0 }
//!     fn rand(&mut self, _: i64) -> i64 { 0 }
//! }
//!
//! let growth = expr::parse("1 + level / 5").unwrap();
//! let mut hero = Hero { level: 10 };
//! assert_eq!(expr::evaluate(&growth, &mut hero), Ok(Value::Int(3)));
//! ```

mod ast;
mod error;
mod eval;
mod lexer;
mod parser;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use error::{ExprError, Result};
pub use eval::{evaluate, evaluate_bool, evaluate_int, ExprContext, Value};
pub use lexer::{tokenize, Token, TokenKind};
pub use parser::parse;
