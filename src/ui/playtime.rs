//! Play time display for the main menu.
//!
//! The time is drawn next to the party's gold, either in its own window
//! stacked with the gold window or on a second line inside it.

use serde::{Deserialize, Serialize};

use crate::core::PlaytimeConfig;

/// Elapsed play time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playtime {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Playtime {
    /// Convert a frame count.
    #[must_use]
    pub fn from_frames(frames: u64, frame_rate: u32) -> Self {
        let total = frames / u64::from(frame_rate.max(1));
        Self {
            hours: total / 3600,
            minutes: total / 60 % 60,
            seconds: total % 60,
        }
    }

    /// `HH:MM:SS` for a frame count.
    #[must_use]
    pub fn format(frames: u64, frame_rate: u32) -> String {
        Self::from_frames(frames, frame_rate).to_string()
    }
}

impl std::fmt::Display for Playtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// A window rectangle in screen pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Window measurements of the host UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowMetrics {
    pub screen_width: i32,
    pub screen_height: i32,
    pub gold_width: i32,
    pub line_height: i32,
    pub padding: i32,
}

impl WindowMetrics {
    /// Height of a window showing `lines` lines.
    #[must_use]
    pub fn fitting_height(&self, lines: i32) -> i32 {
        lines * self.line_height + self.padding * 2
    }
}

impl Default for WindowMetrics {
    fn default() -> Self {
        Self {
            screen_width: 544,
            screen_height: 416,
            gold_width: 160,
            line_height: 24,
            padding: 12,
        }
    }
}

/// Where the gold and play time go on the menu screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuPlaytimeLayout {
    pub gold_window: Rect,
    /// Separate play time window, absent when sharing the gold window.
    pub time_window: Option<Rect>,
    /// Line of the gold value inside the gold window.
    pub gold_line: i32,
    /// Line of the play time inside its window.
    pub time_line: i32,
}

impl MenuPlaytimeLayout {
    /// Lay out the menu's gold and play time windows.
    #[must_use]
    pub fn compute(metrics: &WindowMetrics, config: &PlaytimeConfig) -> Self {
        let one_line = metrics.fitting_height(1);

        if config.in_gold_window {
            let height = metrics.fitting_height(2);
            let (gold_line, time_line) = if config.above_gold { (1, 0) } else { (0, 1) };
            return Self {
                gold_window: Rect {
                    x: 0,
                    y: metrics.screen_height - height,
                    width: metrics.gold_width,
                    height,
                },
                time_window: None,
                gold_line,
                time_line,
            };
        }

        let (gold_y, time_y) = if config.above_gold {
            (metrics.screen_height - one_line, metrics.screen_height - one_line * 2)
        } else {
            (metrics.screen_height - one_line * 2, metrics.screen_height - one_line)
        };

        Self {
            gold_window: Rect {
                x: 0,
                y: gold_y,
                width: metrics.gold_width,
                height: one_line,
            },
            time_window: Some(Rect {
                x: metrics.screen_width - metrics.gold_width,
                y: time_y,
                width: metrics.gold_width,
                height: one_line,
            }),
            gold_line: 0,
            time_line: 0,
        }
    }
}
