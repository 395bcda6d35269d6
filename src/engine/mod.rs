//! The engine: world state, event dispatch and event commands.
//!
//! [`World`] holds the data the rules read. [`Engine`] wraps it with the
//! listener registry and exposes one method per host hook. [`Interpreter`]
//! runs the event commands that have rule side effects.

pub mod battle;
pub mod context;
pub mod interpreter;
pub mod world;

pub use battle::Engine;
pub use context::SubjectContext;
pub use interpreter::{ActorTarget, Command, Interpreter, Operand, Operation};
pub use world::{GameFlags, World};
