//! Notetag scanning.
//!
//! Database records carry free-text notes. This module finds the tags the
//! battle rules understand and turns them into typed values; it does not
//! evaluate anything.
//!
//! All tags are case-insensitive.
//!
//! ## Auto-State Blocks
//!
//! ```text
//! <apply auto state hp damage: 14>
//! hp lower 25%;
//! </apply auto state>
//! ```
//!
//! See [`auto_state`].
//!
//! ## Tech Tags
//!
//! `<tech skill>`, `<tech growth S: expr>`, `<tech limit S: n>`,
//! `<infinite tech points>`, `<change tech point S: ±n>` and the event
//! comment forms. See [`tech`].

pub mod auto_state;
pub mod tech;

use thiserror::Error;

/// Errors found while scanning notes.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NoteTagError {
    /// Trigger text names no known trigger.
    #[error("unknown auto state trigger `{0}`")]
    UnknownTrigger(String),

    /// State list contains something other than ids.
    #[error("invalid state list `{0}`")]
    InvalidStateList(String),

    /// State list is empty.
    #[error("auto state block `{0}` lists no states")]
    NoStates(String),

    /// Opening tag without a closing `</apply auto state>`.
    #[error("auto state block `{0}` is never closed")]
    Unterminated(String),
}

/// Result type for notetag scanning.
pub type Result<T> = std::result::Result<T, NoteTagError>;

pub use auto_state::{parse_blocks, parse_state_list};
pub use tech::{comment_calls, item_changes, CommentCall, TechChange, TechChangeKind};
