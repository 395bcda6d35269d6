//! Battle party command menu: Fight or Escape.

use serde::{Deserialize, Serialize};

use crate::core::PartyCommandConfig;
use crate::engine::World;

/// Party command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartyCommand {
    Fight,
    Escape,
}

impl PartyCommand {
    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            PartyCommand::Fight => "Fight",
            PartyCommand::Escape => "Escape",
        }
    }
}

/// One menu entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEntry {
    pub command: PartyCommand,
    pub enabled: bool,
}

/// The party command window's contents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyCommandList {
    entries: Vec<CommandEntry>,
    index: usize,
}

impl PartyCommandList {
    /// Window width in pixels.
    pub const WINDOW_WIDTH: i32 = 128;

    /// Visible lines.
    pub const VISIBLE_LINES: usize = 4;

    /// Build the list with the first entry selected.
    ///
    /// Fight is disabled while the configured switch is ON; Escape is
    /// enabled only when the world allows escaping.
    #[must_use]
    pub fn build(world: &World, config: &PartyCommandConfig) -> Self {
        let fight_enabled = config
            .fight_disable_switch
            .map_or(true, |switch| !world.switch(switch));

        Self {
            entries: vec![
                CommandEntry {
                    command: PartyCommand::Fight,
                    enabled: fight_enabled,
                },
                CommandEntry {
                    command: PartyCommand::Escape,
                    enabled: world.can_escape,
                },
            ],
            index: 0,
        }
    }

    /// All entries.
    #[must_use]
    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    /// Selected entry.
    #[must_use]
    pub fn current(&self) -> Option<CommandEntry> {
        self.entries.get(self.index).copied()
    }

    /// Selected index.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Select an entry by index. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) {
        if index < self.entries.len() {
            self.index = index;
        }
    }

    /// Is the command present and enabled?
    #[must_use]
    pub fn is_enabled(&self, command: PartyCommand) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.command == command && entry.enabled)
    }

    /// The selected command, if it can be chosen.
    #[must_use]
    pub fn confirm(&self) -> Option<PartyCommand> {
        self.current()
            .filter(|entry| entry.enabled)
            .map(|entry| entry.command)
    }
}
