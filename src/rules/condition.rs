//! Auto-state conditions.
//!
//! Each `;`-terminated segment of an auto-state block is one condition.
//! Two forms are understood:
//!
//! - **Structured**: `STAT OP VALUE` where `OP` is `higher`, `lower`,
//!   `equal` or `different` (`greater`/`less` also accepted). A `N%` value
//!   on `hp`, `mp` or `tp` compares against the gauge's maximum.
//! - **Script**: any other text, parsed as an [expression](crate::expr).
//!
//! Text that is neither becomes [`Condition::Invalid`], which is never met.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::battler::Gauge;
use crate::expr::{self, Expr, ExprContext, ExprError};

static STRUCTURED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\w+)\s+(higher|lower|equal|different|greater|less)\s+([^<>]*)")
        .expect("structured condition pattern")
});

static PERCENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*%$").expect("percent pattern"));

/// Comparison operator of a structured condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    Higher,
    Lower,
    Equal,
    Different,
}

impl CompareOp {
    /// Parse an operator word.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "higher" | "greater" => Some(CompareOp::Higher),
            "lower" | "less" => Some(CompareOp::Lower),
            "equal" => Some(CompareOp::Equal),
            "different" => Some(CompareOp::Different),
            _ => None,
        }
    }

    /// Apply the operator.
    #[must_use]
    pub fn compare(self, lhs: i64, rhs: i64) -> bool {
        match self {
            CompareOp::Higher => lhs > rhs,
            CompareOp::Lower => lhs < rhs,
            CompareOp::Equal => lhs == rhs,
            CompareOp::Different => lhs != rhs,
        }
    }
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CompareOp::Higher => "higher",
            CompareOp::Lower => "lower",
            CompareOp::Equal => "equal",
            CompareOp::Different => "different",
        };
        f.write_str(name)
    }
}

/// Right-hand side of a structured condition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Threshold {
    /// Percentage of a gauge's maximum.
    Percent(i64),
    /// Value of an expression.
    Absolute(Expr),
}

/// A single auto-state condition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    /// `stat op threshold`.
    Stat {
        stat: String,
        op: CompareOp,
        threshold: Threshold,
    },

    /// Free-form boolean expression.
    Script(Expr),

    /// Text that could not be parsed. Never met.
    Invalid { source: String, reason: String },
}

impl Condition {
    /// Parse one condition segment.
    ///
    /// Never fails: unparseable text becomes [`Condition::Invalid`].
    #[must_use]
    pub fn parse(segment: &str) -> Self {
        let segment = segment.trim();

        if let Some(caps) = STRUCTURED.captures(segment) {
            let stat = caps[1].to_string();
            let Some(op) = CompareOp::from_name(&caps[2]) else {
                return Self::invalid(segment, "unknown comparison");
            };
            let value = caps[3].trim();

            if let Some(pct) = PERCENT.captures(value) {
                let Ok(pct) = pct[1].parse::<i64>() else {
                    return Self::invalid(segment, ExprError::Overflow);
                };
                let threshold = if Gauge::from_name(&stat).is_some() {
                    Threshold::Percent(pct)
                } else {
                    Threshold::Absolute(Expr::Int(pct))
                };
                return Condition::Stat { stat, op, threshold };
            }

            return match expr::parse(value) {
                Ok(expr) => Condition::Stat {
                    stat,
                    op,
                    threshold: Threshold::Absolute(expr),
                },
                Err(err) => Self::invalid(segment, err),
            };
        }

        match expr::parse(segment) {
            Ok(expr) => Condition::Script(expr),
            Err(err) => Self::invalid(segment, err),
        }
    }

    fn invalid(source: &str, reason: impl ToString) -> Self {
        Condition::Invalid {
            source: source.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Is this a parse failure?
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Condition::Invalid { .. })
    }

    /// Evaluate against a battler.
    ///
    /// `Invalid` evaluates to `Ok(false)`. Unknown stats and expression
    /// failures are errors; callers decide how to treat them.
    pub fn evaluate(&self, ctx: &mut dyn ExprContext) -> expr::Result<bool> {
        match self {
            Condition::Stat { stat, op, threshold } => {
                let current = ctx
                    .stat(stat)
                    .ok_or_else(|| ExprError::UnknownIdentifier(stat.clone()))?;

                match threshold {
                    Threshold::Percent(pct) => {
                        let max = Gauge::from_name(stat)
                            .and_then(|gauge| ctx.stat(gauge.max_param().name()))
                            .unwrap_or(0);
                        compare_percent(*op, current, max, *pct)
                    }
                    Threshold::Absolute(expr) => {
                        let rhs = expr::evaluate_int(expr, ctx)?;
                        Ok(op.compare(current, rhs))
                    }
                }
            }
            Condition::Script(expr) => expr::evaluate_bool(expr, ctx),
            Condition::Invalid { .. } => Ok(false),
        }
    }
}

/// Compare `current / max` against `pct / 100` without division.
///
/// A zero maximum counts as a rate of 0.
fn compare_percent(op: CompareOp, current: i64, max: i64, pct: i64) -> expr::Result<bool> {
    if max <= 0 {
        return Ok(op.compare(0, pct));
    }
    let lhs = current.checked_mul(100).ok_or(ExprError::Overflow)?;
    let rhs = pct.checked_mul(max).ok_or(ExprError::Overflow)?;
    Ok(op.compare(lhs, rhs))
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::Stat { stat, op, threshold: Threshold::Percent(pct) } => {
                write!(f, "{} {} {}%", stat, op, pct)
            }
            Condition::Stat { stat, op, threshold: Threshold::Absolute(expr) } => {
                write!(f, "{} {} {}", stat, op, expr)
            }
            Condition::Script(expr) => write!(f, "{}", expr),
            Condition::Invalid { source, reason } => write!(f, "<invalid `{}`: {}>", source, reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    #[derive(Default)]
    struct Stats {
        values: FxHashMap<&'static str, i64>,
        switches: Vec<u32>,
    }

    impl Stats {
        fn with(mut self, name: &'static str, value: i64) -> Self {
            self.values.insert(name, value);
            self
        }
    }

    impl ExprContext for Stats {
        fn stat(&self, name: &str) -> Option<i64> {
            self.values.get(name).copied()
        }
        fn has_state(&self, _: u32) -> bool {
            false
        }
        fn state_addable(&self, _: u32) -> bool {
            true
        }
        fn switch(&self, id: u32) -> bool {
            self.switches.contains(&id)
        }
        fn variable(&self, _: u32) -> i64 {
            0
        }
        fn rand(&mut self, _: i64) -> i64 {
            0
        }
    }

    fn gauge(hp: i64, mhp: i64) -> Stats {
        Stats::default().with("hp", hp).with("mhp", mhp)
    }

    #[test]
    fn test_parse_structured_percent() {
        assert_eq!(
            Condition::parse("hp lower 25%"),
            Condition::Stat {
                stat: "hp".into(),
                op: CompareOp::Lower,
                threshold: Threshold::Percent(25),
            }
        );
        assert_eq!(
            Condition::parse("  MP GREATER 50 %  "),
            Condition::Stat {
                stat: "MP".into(),
                op: CompareOp::Higher,
                threshold: Threshold::Percent(50),
            }
        );
    }

    #[test]
    fn test_percent_on_non_gauge_is_absolute() {
        assert_eq!(
            Condition::parse("atk higher 50%"),
            Condition::Stat {
                stat: "atk".into(),
                op: CompareOp::Higher,
                threshold: Threshold::Absolute(Expr::Int(50)),
            }
        );
    }

    #[test]
    fn test_parse_structured_expression() {
        let cond = Condition::parse("level equal variable(3) + 1");
        assert!(matches!(
            cond,
            Condition::Stat { ref stat, op: CompareOp::Equal, threshold: Threshold::Absolute(_) } if stat == "level"
        ));
    }

    #[test]
    fn test_parse_script_and_invalid() {
        assert!(matches!(Condition::parse("state?(1) || rand(100) < 30"), Condition::Script(_)));
        assert!(Condition::parse("hp lower lots%").is_invalid());
        assert!(Condition::parse("@@@").is_invalid());
    }

    #[test]
    fn test_hp_lower_quarter() {
        let cond = Condition::parse("hp lower 25%");
        assert_eq!(cond.evaluate(&mut gauge(20, 100)), Ok(true));
        assert_eq!(cond.evaluate(&mut gauge(25, 100)), Ok(false));
        assert_eq!(cond.evaluate(&mut gauge(30, 100)), Ok(false));
    }

    #[test]
    fn test_equal_full() {
        let cond = Condition::parse("hp equal 100%");
        assert_eq!(cond.evaluate(&mut gauge(100, 100)), Ok(true));
        assert_eq!(cond.evaluate(&mut gauge(99, 100)), Ok(false));
        // 333/333 is 100% even though 333 is not a multiple of 100.
        assert_eq!(cond.evaluate(&mut gauge(333, 333)), Ok(true));
    }

    #[test]
    fn test_zero_max_is_rate_zero() {
        let mut stats = Stats::default().with("mp", 0).with("mmp", 0);
        assert_eq!(Condition::parse("mp lower 10%").evaluate(&mut stats), Ok(true));
        assert_eq!(Condition::parse("mp equal 0%").evaluate(&mut stats), Ok(true));
        assert_eq!(Condition::parse("mp higher 0%").evaluate(&mut stats), Ok(false));
    }

    #[test]
    fn test_absolute_comparisons() {
        let mut stats = Stats::default().with("atk", 40).with("level", 10);
        assert_eq!(Condition::parse("atk higher 30").evaluate(&mut stats), Ok(true));
        assert_eq!(Condition::parse("atk different 40").evaluate(&mut stats), Ok(false));
        assert_eq!(Condition::parse("atk equal level * 4").evaluate(&mut stats), Ok(true));
        assert_eq!(Condition::parse("level less 5").evaluate(&mut stats), Ok(false));
    }

    #[test]
    fn test_script() {
        let mut stats = Stats { switches: vec![7], ..Stats::default() };
        assert_eq!(Condition::parse("switch(7)").evaluate(&mut stats), Ok(true));
        assert_eq!(Condition::parse("$game_switches[8]").evaluate(&mut stats), Ok(false));
    }

    #[test]
    fn test_unknown_stat_is_error() {
        let cond = Condition::parse("charisma higher 3");
        assert_eq!(
            cond.evaluate(&mut Stats::default()),
            Err(ExprError::UnknownIdentifier("charisma".into()))
        );
    }

    #[test]
    fn test_invalid_is_false() {
        let cond = Condition::parse("1 +");
        assert_eq!(cond.evaluate(&mut Stats::default()), Ok(false));
    }

    #[test]
    fn test_deep_nesting_is_invalid() {
        let parens = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        let bangs = format!("{}true", "!".repeat(10_000));
        let threshold = format!("hp higher {}1{}", "(".repeat(10_000), ")".repeat(10_000));
        for source in [parens, bangs, threshold] {
            let cond = Condition::parse(&source);
            assert!(cond.is_invalid(), "{}", &source[..20]);
            assert_eq!(cond.evaluate(&mut Stats::default()), Ok(false));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Condition::parse("hp lower 25%")), "hp lower 25%");
        assert_eq!(format!("{}", Condition::parse("atk higher 1 + 2")), "atk higher (1 + 2)");
    }
}
