//! Tech-point tags.
//!
//! | where          | tag                                    |
//! |----------------|----------------------------------------|
//! | battler notes  | `<tech growth S: expr>`                |
//! | battler notes  | `<tech limit S: n>`                    |
//! | battler notes  | `<infinite tech point(s)>`             |
//! | skill note     | `<tech skill>`                         |
//! | skill note     | `<tech growth: expr>`                  |
//! | skill note     | `<tech limit: n>`                      |
//! | skill/item     | `<change tech point S: ±n>`            |
//! | skill/item     | `<change max tech point S: ±n>`        |
//! | event comment  | `<change tech point A: S, ±n>`         |
//! | event comment  | `<change max tech point A: S, ±n>`     |
//! | event comment  | `<recover tech points: A>`             |
//! | event comment  | `<recover all tech points>`            |
//!
//! Battler notes are the concatenated notes of the actor, class,
//! equipment and current states (or the enemy and its states).

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::{ActorId, SkillId};

macro_rules! tag {
    ($name:ident, $pattern:literal) => {
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($pattern).expect(stringify!($name)));
    };
}

tag!(TECH_SKILL, r"(?i)<tech skill>");
tag!(INFINITE, r"(?i)<infinite tech points?>");
tag!(BATTLER_GROWTH, r"(?i)<tech growth\s+(\d+)\s*:\s*([^>]+)>");
tag!(BATTLER_LIMIT, r"(?i)<tech limit\s+(\d+)\s*:\s*(\d+)\s*>");
tag!(SKILL_GROWTH, r"(?i)<tech growth\s*:\s*([^>]+)>");
tag!(SKILL_LIMIT, r"(?i)<tech limit\s*:\s*(\d+)\s*>");
tag!(CHANGE, r"(?i)<change tech point\s+(\d+)\s*:\s*([+-]?\d+)\s*>");
tag!(CHANGE_MAX, r"(?i)<change max tech point\s+(\d+)\s*:\s*([+-]?\d+)\s*>");
tag!(CALL_CHANGE, r"(?i)<change tech point\s+(\d+)\s*:\s*(\d+)\s*,\s*([+-]?\d+)\s*>");
tag!(CALL_CHANGE_MAX, r"(?i)<change max tech point\s+(\d+)\s*:\s*(\d+)\s*,\s*([+-]?\d+)\s*>");
tag!(CALL_RECOVER, r"(?i)<recover tech points\s*:\s*(\d+)\s*>");
tag!(CALL_RECOVER_ALL, r"(?i)<recover all tech points>");

/// Is the skill tagged `<tech skill>`?
#[must_use]
pub fn is_tech_skill(note: &str) -> bool {
    TECH_SKILL.is_match(note)
}

/// Do the battler notes grant unlimited tech points?
#[must_use]
pub fn has_infinite_tech_points(notes: &str) -> bool {
    INFINITE.is_match(notes)
}

/// Every `<tech growth S: expr>` expression for `skill`, in note order.
#[must_use]
pub fn battler_growths(notes: &str, skill: SkillId) -> Vec<&str> {
    BATTLER_GROWTH
        .captures_iter(notes)
        .filter(|caps| parse_u32(&caps[1]) == Some(skill.raw()))
        .filter_map(|caps| caps.get(2).map(|m| m.as_str().trim()))
        .collect()
}

/// Every `<tech limit S: n>` value for `skill`, in note order.
#[must_use]
pub fn battler_limits(notes: &str, skill: SkillId) -> Vec<i64> {
    BATTLER_LIMIT
        .captures_iter(notes)
        .filter(|caps| parse_u32(&caps[1]) == Some(skill.raw()))
        .filter_map(|caps| caps[2].parse().ok())
        .collect()
}

/// The skill's own `<tech growth: expr>`.
#[must_use]
pub fn skill_growth(note: &str) -> Option<&str> {
    SKILL_GROWTH
        .captures(note)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// The skill's own `<tech limit: n>`.
#[must_use]
pub fn skill_limit(note: &str) -> Option<i64> {
    SKILL_LIMIT.captures(note).and_then(|caps| caps[1].parse().ok())
}

/// Whether a change hits current points or the max bonus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TechChangeKind {
    Points,
    Max,
}

/// A `<change tech point S: ±n>` or `<change max tech point S: ±n>` tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechChange {
    pub kind: TechChangeKind,
    pub skill: SkillId,
    pub delta: i64,
}

/// Tech changes carried by a skill or item note.
///
/// Current-point changes come first, then max changes, each in note order.
#[must_use]
pub fn item_changes(note: &str) -> Vec<TechChange> {
    let points = CHANGE.captures_iter(note).filter_map(|caps| {
        Some(TechChange {
            kind: TechChangeKind::Points,
            skill: SkillId::new(parse_u32(&caps[1])?),
            delta: caps[2].parse().ok()?,
        })
    });
    let max = CHANGE_MAX.captures_iter(note).filter_map(|caps| {
        Some(TechChange {
            kind: TechChangeKind::Max,
            skill: SkillId::new(parse_u32(&caps[1])?),
            delta: caps[2].parse().ok()?,
        })
    });
    points.chain(max).collect()
}

/// A tech-point instruction found in an event comment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentCall {
    /// Change an actor's current points for one skill.
    Change { actor: ActorId, change: TechChange },
    /// Fully recover one actor's tech points.
    Recover(ActorId),
    /// Fully recover every party member's tech points.
    RecoverAll,
}

/// Tech-point instructions in an event comment.
///
/// Order: point changes, max changes, single recoveries, then recover-all.
#[must_use]
pub fn comment_calls(text: &str) -> Vec<CommentCall> {
    let mut calls = Vec::new();

    for (regex, kind) in [
        (&*CALL_CHANGE, TechChangeKind::Points),
        (&*CALL_CHANGE_MAX, TechChangeKind::Max),
    ] {
        calls.extend(regex.captures_iter(text).filter_map(|caps| {
            Some(CommentCall::Change {
                actor: ActorId::new(parse_u32(&caps[1])?),
                change: TechChange {
                    kind,
                    skill: SkillId::new(parse_u32(&caps[2])?),
                    delta: caps[3].parse().ok()?,
                },
            })
        }));
    }

    calls.extend(
        CALL_RECOVER
            .captures_iter(text)
            .filter_map(|caps| Some(CommentCall::Recover(ActorId::new(parse_u32(&caps[1])?)))),
    );

    if CALL_RECOVER_ALL.is_match(text) {
        calls.push(CommentCall::RecoverAll);
    }

    calls
}

fn parse_u32(text: &str) -> Option<u32> {
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags() {
        assert!(is_tech_skill("<Tech Skill>"));
        assert!(!is_tech_skill("<tech skills>"));
        assert!(has_infinite_tech_points("<infinite tech point>"));
        assert!(has_infinite_tech_points("<INFINITE TECH POINTS>"));
        assert!(!has_infinite_tech_points("<infinite>"));
    }

    #[test]
    fn test_battler_overrides() {
        let notes = "<tech growth 3: level / 2>\n<tech growth 4: 9>\n<tech growth 3: 5>\n\
                     <tech limit 3: 12>\n<tech limit 3: 30>";
        assert_eq!(battler_growths(notes, SkillId::new(3)), vec!["level / 2", "5"]);
        assert_eq!(battler_growths(notes, SkillId::new(4)), vec!["9"]);
        assert!(battler_growths(notes, SkillId::new(5)).is_empty());
        assert_eq!(battler_limits(notes, SkillId::new(3)), vec![12, 30]);
    }

    #[test]
    fn test_skill_tags_do_not_match_battler_forms() {
        let note = "<tech growth 3: 7>\n<tech limit 3: 9>";
        assert_eq!(skill_growth(note), None);
        assert_eq!(skill_limit(note), None);

        let note = "<tech growth: 2 + level / 10>\n<tech limit: 8>";
        assert_eq!(skill_growth(note), Some("2 + level / 10"));
        assert_eq!(skill_limit(note), Some(8));
        assert!(battler_growths(note, SkillId::new(2)).is_empty());
    }

    #[test]
    fn test_item_changes() {
        let note = "<change tech point 3: +2>\n<change max tech point 3: -1>\n<change tech point 5: 1>";
        assert_eq!(
            item_changes(note),
            vec![
                TechChange { kind: TechChangeKind::Points, skill: SkillId::new(3), delta: 2 },
                TechChange { kind: TechChangeKind::Points, skill: SkillId::new(5), delta: 1 },
                TechChange { kind: TechChangeKind::Max, skill: SkillId::new(3), delta: -1 },
            ]
        );
    }

    #[test]
    fn test_item_changes_ignore_comment_form() {
        assert!(item_changes("<change tech point 1: 3, +1>").is_empty());
    }

    #[test]
    fn test_comment_calls() {
        let text = "<change tech point 1: 3, +2>\n<change max tech point 2: 4, -1>\n\
                    <recover tech points:5>\n<recover tech points: 6>";
        assert_eq!(
            comment_calls(text),
            vec![
                CommentCall::Change {
                    actor: ActorId::new(1),
                    change: TechChange { kind: TechChangeKind::Points, skill: SkillId::new(3), delta: 2 },
                },
                CommentCall::Change {
                    actor: ActorId::new(2),
                    change: TechChange { kind: TechChangeKind::Max, skill: SkillId::new(4), delta: -1 },
                },
                CommentCall::Recover(ActorId::new(5)),
                CommentCall::Recover(ActorId::new(6)),
            ]
        );
    }

    #[test]
    fn test_recover_all_requires_tag() {
        assert!(comment_calls("just a comment").is_empty());
        assert_eq!(comment_calls("<Recover All Tech Points>"), vec![CommentCall::RecoverAll]);
    }
}
