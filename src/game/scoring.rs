//! Points bookkeeping, independent of the learning reward.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Deterministic points rule applied to every turn.
///
/// A turn that would leave points unchanged loses `tie_break` instead, so no
/// turn is ever neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRule {
    /// Points lost for trying to move through the grid boundary.
    pub boundary_penalty: Option<i64>,
    /// Points gained for jumping on the grid center.
    pub center_jump_bonus: Option<i64>,
    /// Points lost on a turn that would otherwise score nothing.
    pub tie_break: i64,
}

impl ScoringRule {
    /// Only the tie-break applies.
    pub fn tie_break_only() -> Self {
        Self {
            boundary_penalty: None,
            center_jump_bonus: None,
            tie_break: 1,
        }
    }

    /// Points delta for a turn.
    ///
    /// `blocked` is true when a directional move was rejected by the
    /// boundary; `center_jump` when the agent jumped on the center cell.
    /// Saturates at the `i64` range rather than overflowing.
    pub fn delta(&self, blocked: bool, center_jump: bool) -> i64 {
        let mut delta: i64 = 0;
        if blocked && let Some(penalty) = self.boundary_penalty {
            delta = delta.saturating_sub(penalty);
        }
        if center_jump && let Some(bonus) = self.center_jump_bonus {
            delta = delta.saturating_add(bonus);
        }
        if delta == 0 {
            delta = delta.saturating_sub(self.tie_break);
        }
        delta
    }

    pub fn validate(&self) -> Result<()> {
        if self.tie_break <= 0 {
            return Err(Error::config(format!(
                "tie_break must be positive so no turn is neutral (got {})",
                self.tie_break
            )));
        }
        Ok(())
    }
}

impl Default for ScoringRule {
    fn default() -> Self {
        Self {
            boundary_penalty: Some(10),
            center_jump_bonus: Some(100),
            tie_break: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rule_matches_classic_scores() {
        let rule = ScoringRule::default();
        assert_eq!(rule.delta(true, false), -10);
        assert_eq!(rule.delta(false, true), 100);
        assert_eq!(rule.delta(false, false), -1);
    }

    #[test]
    fn disabled_rules_fall_back_to_tie_break() {
        let rule = ScoringRule::tie_break_only();
        assert_eq!(rule.delta(true, false), -1);
        assert_eq!(rule.delta(false, true), -1);
    }

    #[test]
    fn cancelling_rules_still_cost_tie_break() {
        let rule = ScoringRule {
            boundary_penalty: Some(5),
            center_jump_bonus: Some(5),
            tie_break: 2,
        };
        assert_eq!(rule.delta(true, true), -2);
    }

    #[test]
    fn extreme_values_saturate() {
        let rule = ScoringRule {
            boundary_penalty: Some(i64::MIN),
            center_jump_bonus: Some(i64::MAX),
            tie_break: i64::MAX,
        };
        assert!(rule.validate().is_ok());
        assert_eq!(rule.delta(true, false), i64::MAX);
        assert_eq!(rule.delta(false, true), i64::MAX);
        assert_eq!(rule.delta(false, false), -i64::MAX);

        let rule = ScoringRule {
            boundary_penalty: Some(i64::MAX),
            center_jump_bonus: Some(i64::MIN),
            tie_break: 1,
        };
        assert_eq!(rule.delta(true, false), -i64::MAX);
        assert_eq!(rule.delta(false, true), i64::MIN);
    }

    #[test]
    fn tie_break_must_be_positive() {
        let rule = ScoringRule {
            tie_break: 0,
            ..ScoringRule::default()
        };
        assert!(rule.validate().is_err());
    }
}
