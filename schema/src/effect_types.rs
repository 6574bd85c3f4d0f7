use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum StatusEffectKind {
    Shield,
    Stun,
    Burn,
    AtkUp,
    AtkDown,
    DefUp,
    DefDown,
}

/// Which stat a percentage modifier acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifiedStat {
    Attack,
    Defense,
}

impl StatusEffectKind {
    /// Stat modifiers follow the magnitude-based stacking rule.
    pub fn is_stat_modifier(self) -> bool {
        self.modified_stat().is_some()
    }

    /// The stat this kind modifies, and whether it raises (+1) or lowers (-1) it.
    pub fn stat_direction(self) -> Option<(ModifiedStat, f64)> {
        match self {
            StatusEffectKind::AtkUp => Some((ModifiedStat::Attack, 1.0)),
            StatusEffectKind::AtkDown => Some((ModifiedStat::Attack, -1.0)),
            StatusEffectKind::DefUp => Some((ModifiedStat::Defense, 1.0)),
            StatusEffectKind::DefDown => Some((ModifiedStat::Defense, -1.0)),
            _ => None,
        }
    }

    pub fn modified_stat(self) -> Option<ModifiedStat> {
        self.stat_direction().map(|(stat, _)| stat)
    }
}
