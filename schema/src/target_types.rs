use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// How an action picks the combatants it affects.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum TargetPattern {
    #[serde(rename = "Self")]
    #[strum(serialize = "Self")]
    SelfOnly,
    SingleEnemy,
    SingleAlly,
    AllEnemies,
    AllAllies,
    LowestHpEnemy,
    HighestThreatEnemy,
    FrontRowSingle,
    BackRowSingle,
    FrontRowAll,
    BackRowAll,
    ColumnSingle,
    ColumnAll,
}

impl TargetPattern {
    /// True for the patterns whose actions support allies instead of damaging enemies.
    pub fn is_ally_targeting(self) -> bool {
        matches!(
            self,
            TargetPattern::SelfOnly | TargetPattern::SingleAlly | TargetPattern::AllAllies
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_only_support_patterns_are_ally_targeting() {
        let ally: Vec<TargetPattern> = TargetPattern::iter()
            .filter(|p| p.is_ally_targeting())
            .collect();
        assert_eq!(
            ally,
            vec![
                TargetPattern::SelfOnly,
                TargetPattern::SingleAlly,
                TargetPattern::AllAllies
            ]
        );
    }

    #[test]
    fn test_pattern_names_round_trip_through_strings() {
        assert_eq!(TargetPattern::from_str("Self").unwrap(), TargetPattern::SelfOnly);
        assert_eq!(TargetPattern::SelfOnly.to_string(), "Self");
        assert_eq!(
            TargetPattern::from_str("BackRowAll").unwrap(),
            TargetPattern::BackRowAll
        );
        assert!(TargetPattern::from_str("Diagonal").is_err());
    }
}
