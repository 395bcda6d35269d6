//! Battle listeners and their registry.
//!
//! Listeners replace patched-in engine behaviour: every rule system
//! registers a listener, and the engine calls each interested listener in
//! priority order when an event fires.

use std::sync::Arc;

use crate::core::BattlerRef;
use crate::engine::Engine;

use super::event::BattleEvent;

/// Reacts to battle events.
///
/// Listeners receive the engine mutably and may raise further events
/// (adding a state raises `StateAdded`, for example). Nested dispatch is
/// bounded by the engine's cascade depth.
pub trait BattleListener: Send + Sync {
    /// Name for logs.
    fn name(&self) -> &'static str;

    /// Lower values run first.
    fn priority(&self) -> i32 {
        0
    }

    /// Does this listener care about the event?
    fn handles(&self, event: &BattleEvent) -> bool {
        let _ = event;
        true
    }

    /// Handle an event raised for `who`.
    fn on_event(&self, engine: &mut Engine, who: BattlerRef, event: &BattleEvent);
}

/// Ordered set of listeners.
///
/// Listeners are sorted by priority; equal priorities keep registration
/// order.
#[derive(Clone)]
pub struct ListenerRegistry {
    listeners: Arc<[Arc<dyn BattleListener>]>,
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self {
            listeners: Arc::from(Vec::<Arc<dyn BattleListener>>::new()),
        }
    }
}

impl ListenerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener.
    pub fn register(&mut self, listener: Arc<dyn BattleListener>) {
        let mut listeners: Vec<_> = self.listeners.iter().cloned().collect();
        listeners.push(listener);
        listeners.sort_by_key(|l| l.priority());
        self.listeners = listeners.into();
    }

    /// Remove every listener with the given name. Returns how many were removed.
    pub fn unregister(&mut self, name: &str) -> usize {
        let before = self.listeners.len();
        let kept: Vec<_> = self
            .listeners
            .iter()
            .filter(|l| l.name() != name)
            .cloned()
            .collect();
        self.listeners = kept.into();
        before - self.listeners.len()
    }

    /// Shared handle to the current list, unaffected by later changes.
    #[must_use]
    pub fn snapshot(&self) -> Arc<[Arc<dyn BattleListener>]> {
        Arc::clone(&self.listeners)
    }

    /// Number of listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Is the registry empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Listener names and priorities in call order.
    pub fn listeners(&self) -> impl Iterator<Item = (&'static str, i32)> + '_ {
        self.listeners.iter().map(|l| (l.name(), l.priority()))
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.listeners()).finish()
    }
}
