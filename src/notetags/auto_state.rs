//! `<apply auto state …>` blocks.
//!
//! ```text
//! <apply auto state TRIGGER: id, id, ...>
//! condition;
//! condition;
//! </apply auto state>
//! ```
//!
//! Conditions are the `;`-terminated segments of the body. Anything after
//! the final `;` is ignored, as are blank segments.

use std::sync::LazyLock;

use regex::Regex;
use smallvec::SmallVec;

use crate::core::StateId;
use crate::rules::{AutoStateRule, Condition, Trigger};

use super::{NoteTagError, Result};

static BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<apply auto state\s+([^:>]*):([^>]*)>(.*?)</apply auto state>")
        .expect("auto state block pattern")
});

static OPENING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<apply auto state\s+([^:>]*):[^>]*>").expect("auto state opening pattern")
});

/// Parse every auto-state block in `notes`, in order of appearance.
///
/// Malformed blocks come back as errors in place; well-formed blocks are
/// unaffected by their neighbours.
pub fn parse_blocks(notes: &str) -> Vec<Result<AutoStateRule>> {
    let mut rules = Vec::new();
    let mut closed_until = 0;

    for caps in BLOCK.captures_iter(notes) {
        let whole = &caps[0];
        let start = caps.get(0).map_or(0, |m| m.start());
        report_unterminated(&notes[closed_until..start], &mut rules);
        closed_until = start + whole.len();

        rules.push(parse_block(&caps[1], &caps[2], &caps[3]));
    }
    report_unterminated(&notes[closed_until..], &mut rules);

    rules
}

fn report_unterminated(gap: &str, rules: &mut Vec<Result<AutoStateRule>>) {
    for caps in OPENING.captures_iter(gap) {
        rules.push(Err(NoteTagError::Unterminated(caps[1].trim().to_string())));
    }
}

fn parse_block(trigger_text: &str, state_text: &str, body: &str) -> Result<AutoStateRule> {
    let trigger = Trigger::parse(trigger_text)?;
    let states = parse_state_list(state_text)?;
    if states.is_empty() {
        return Err(NoteTagError::NoStates(trigger_text.trim().to_string()));
    }

    Ok(AutoStateRule {
        trigger,
        states,
        conditions: split_conditions(body).map(Condition::parse).collect(),
    })
}

/// Parse a comma- or space-separated list of state ids.
///
/// Id 0 names no state and is dropped.
pub fn parse_state_list(text: &str) -> Result<SmallVec<[StateId; 4]>> {
    let mut states = SmallVec::new();
    for token in text.split(|c: char| c == ',' || c.is_whitespace()) {
        if token.is_empty() {
            continue;
        }
        let id = token
            .parse::<u32>()
            .map_err(|_| NoteTagError::InvalidStateList(text.trim().to_string()))?;
        if id != 0 {
            states.push(StateId::new(id));
        }
    }
    Ok(states)
}

/// The `;`-terminated, non-blank segments of a block body.
fn split_conditions(body: &str) -> impl Iterator<Item = &str> {
    let terminated = match body.rfind(';') {
        Some(end) => &body[..end],
        None => "",
    };
    terminated
        .split(';')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
}
