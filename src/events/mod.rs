//! Battle events and the listeners that react to them.

pub mod auto_state;
pub mod event;
pub mod listener;
pub mod tech;

pub use auto_state::AutoStateListener;
pub use event::{ActionItem, BattleEvent};
pub use listener::{BattleListener, ListenerRegistry};
pub use tech::TechPointListener;
