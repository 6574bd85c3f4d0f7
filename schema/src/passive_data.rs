use crate::effect_types::StatusEffectKind;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Battle event a passive ability listens for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum PassiveTrigger {
    BattleStart,
    TurnStart,
    OnDamageDealt,
    OnDamageTaken,
    OnKill,
    OnUltimate,
    OnHpThreshold,
    OnAllyLowHp,
}

impl PassiveTrigger {
    /// Triggers gated on an HP ratio at or below the ability's threshold.
    pub fn uses_threshold(self) -> bool {
        matches!(self, PassiveTrigger::OnHpThreshold | PassiveTrigger::OnAllyLowHp)
    }
}

/// Who receives a passive's effect once it fires.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum PassiveTargetRule {
    #[serde(rename = "Self")]
    #[strum(serialize = "Self")]
    SelfOnly,
    /// One uniformly random living ally, never the owner.
    RandomAlly,
    /// Every living ally except the owner.
    AllAllies,
    /// The unit the triggering event was about (the attacker for thorns).
    ContextTarget,
}

/// Declarative trigger rule attached to a combatant definition.
///
/// `effect: None` means a direct heal or damage driven by `value` / `modifier`;
/// `Some(kind)` attaches a status effect of that kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassiveAbility {
    pub name: String,
    pub trigger: PassiveTrigger,
    /// HP ratio in `(0, 1]` for threshold triggers.
    #[serde(default)]
    pub trigger_threshold: Option<f64>,
    #[serde(default)]
    pub value: i32,
    /// Fraction, `0.4` is +40%.
    #[serde(default)]
    pub modifier: f64,
    #[serde(default)]
    pub duration: i32,
    #[serde(default)]
    pub effect: Option<StatusEffectKind>,
    #[serde(default = "default_target_rule")]
    pub target: PassiveTargetRule,
}

fn default_target_rule() -> PassiveTargetRule {
    PassiveTargetRule::SelfOnly
}

impl PassiveAbility {
    /// A passive that attaches a status effect to the owner.
    pub fn status(
        name: &str,
        trigger: PassiveTrigger,
        effect: StatusEffectKind,
        value: i32,
        modifier: f64,
        duration: i32,
    ) -> Self {
        Self {
            name: name.to_string(),
            trigger,
            trigger_threshold: None,
            value,
            modifier,
            duration,
            effect: Some(effect),
            target: PassiveTargetRule::SelfOnly,
        }
    }

    /// A passive that heals (`value > 0`), deals damage (`value < 0`) or steals
    /// life (`modifier > 0` with a damage amount) without a status effect.
    pub fn direct(name: &str, trigger: PassiveTrigger, value: i32, modifier: f64) -> Self {
        Self {
            name: name.to_string(),
            trigger,
            trigger_threshold: None,
            value,
            modifier,
            duration: 0,
            effect: None,
            target: PassiveTargetRule::SelfOnly,
        }
    }

    pub fn with_target(mut self, target: PassiveTargetRule) -> Self {
        self.target = target;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.trigger_threshold = Some(threshold);
        self
    }
}
