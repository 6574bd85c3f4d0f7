//! Stacking, absorption and expiry rules for a combatant's status effects.
//!
//! Effects live in an insertion-ordered `Vec`; every rule here is a plain
//! function over that vector so the ordering guarantees are explicit.

use schema::{ModifiedStat, StatusEffectKind};
use serde::{Deserialize, Serialize};

const MAGNITUDE_EPSILON: f64 = 1e-9;

/// A timed modifier attached to one combatant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: StatusEffectKind,
    /// Flat amount: remaining shield HP, or burn damage per turn.
    pub value: i32,
    /// Fractional stat change, `0.2` is 20%.
    pub modifier: f64,
    pub duration_turns: i32,
}

impl StatusEffect {
    pub fn new(kind: StatusEffectKind, value: i32, modifier: f64, duration_turns: i32) -> Self {
        Self {
            kind,
            value,
            modifier,
            duration_turns,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.duration_turns <= 0
    }
}

/// What happened to an incoming effect under the stacking rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StackOutcome {
    /// Appended as a new independent effect.
    Added,
    /// Appended as an extra stack of an equal-magnitude stat modifier.
    Stacked,
    /// Existing burn had its damage and duration overwritten.
    Refreshed,
    /// A weaker stat modifier was replaced by the incoming one.
    Replaced,
    /// The incoming stat modifier was weaker and was dropped.
    Discarded,
}

fn same_magnitude(a: f64, b: f64) -> bool {
    (a.abs() - b.abs()).abs() < MAGNITUDE_EPSILON
}

/// Attaches `incoming` following the per-kind stacking rules.
pub fn apply_stacked(effects: &mut Vec<StatusEffect>, incoming: StatusEffect) -> StackOutcome {
    match incoming.kind {
        StatusEffectKind::Burn => {
            if let Some(burn) = effects
                .iter_mut()
                .find(|e| e.kind == StatusEffectKind::Burn && !e.is_expired())
            {
                burn.value = incoming.value;
                burn.duration_turns = incoming.duration_turns;
                StackOutcome::Refreshed
            } else {
                effects.push(incoming);
                StackOutcome::Added
            }
        }
        kind if kind.is_stat_modifier() => apply_stat_modifier(effects, incoming),
        _ => {
            effects.push(incoming);
            StackOutcome::Added
        }
    }
}

// Compared against the oldest live effect of the kind; a stronger one takes
// that effect's place and leaves any other stacks alone.
fn apply_stat_modifier(effects: &mut Vec<StatusEffect>, incoming: StatusEffect) -> StackOutcome {
    let existing = effects
        .iter()
        .position(|e| e.kind == incoming.kind && !e.is_expired());

    let Some(matched) = existing else {
        effects.push(incoming);
        return StackOutcome::Added;
    };

    let current = effects[matched].modifier;
    if same_magnitude(current, incoming.modifier) {
        effects.push(incoming);
        StackOutcome::Stacked
    } else if incoming.modifier.abs() > current.abs() {
        effects[matched] = incoming;
        StackOutcome::Replaced
    } else {
        StackOutcome::Discarded
    }
}

pub fn has_active(effects: &[StatusEffect], kind: StatusEffectKind) -> bool {
    effects.iter().any(|e| e.kind == kind && !e.is_expired())
}

/// Remaining shield HP across all live shields.
pub fn shield_total(effects: &[StatusEffect]) -> i32 {
    effects
        .iter()
        .filter(|e| e.kind == StatusEffectKind::Shield && !e.is_expired())
        .map(|e| e.value)
        .sum()
}

/// Burn damage owed this turn.
pub fn burn_total(effects: &[StatusEffect]) -> i32 {
    effects
        .iter()
        .filter(|e| e.kind == StatusEffectKind::Burn && !e.is_expired())
        .map(|e| e.value)
        .sum()
}

/// Net fractional change to `stat`: sum of raises minus sum of reductions.
pub fn stat_modifier_sum(effects: &[StatusEffect], stat: ModifiedStat) -> f64 {
    effects
        .iter()
        .filter(|e| !e.is_expired())
        .filter_map(|e| {
            e.kind
                .stat_direction()
                .filter(|(s, _)| *s == stat)
                .map(|(_, sign)| sign * e.modifier.abs())
        })
        .sum()
}

/// Runs `raw_damage` through the shields, newest first.
///
/// Depleted shields are removed. Returns `(penetrating, absorbed)`.
pub fn absorb_with_shields(effects: &mut Vec<StatusEffect>, raw_damage: i32) -> (i32, i32) {
    let mut remaining = raw_damage.max(0);
    let mut index = effects.len();

    while remaining > 0 && index > 0 {
        index -= 1;
        let effect = &mut effects[index];
        if effect.kind != StatusEffectKind::Shield || effect.is_expired() {
            continue;
        }
        let absorbed = remaining.min(effect.value.max(0));
        effect.value -= absorbed;
        remaining -= absorbed;
        if effect.value <= 0 {
            effects.remove(index);
        }
    }

    (remaining, raw_damage.max(0) - remaining)
}

/// Decrements every duration by one and drops what reached zero.
/// Returns the kinds that expired, in list order.
pub fn tick_durations(effects: &mut Vec<StatusEffect>) -> Vec<StatusEffectKind> {
    let mut expired = Vec::new();
    effects.retain_mut(|e| {
        e.duration_turns -= 1;
        if e.is_expired() {
            expired.push(e.kind);
            false
        } else {
            true
        }
    });
    expired
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn shield(value: i32) -> StatusEffect {
        StatusEffect::new(StatusEffectKind::Shield, value, 0.0, 3)
    }

    #[test]
    fn test_newest_shield_absorbs_first() {
        let mut effects = vec![shield(20), shield(15)];

        let (penetrating, absorbed) = absorb_with_shields(&mut effects, 30);

        assert_eq!(penetrating, 0);
        assert_eq!(absorbed, 30);
        assert_eq!(effects, vec![shield(5)]);
    }

    #[test]
    fn test_damage_beyond_shields_penetrates() {
        let mut effects = vec![shield(10)];
        let (penetrating, absorbed) = absorb_with_shields(&mut effects, 25);
        assert_eq!((penetrating, absorbed), (15, 10));
        assert!(effects.is_empty());
    }

    #[test]
    fn test_absorption_skips_non_shield_effects() {
        let burn = StatusEffect::new(StatusEffectKind::Burn, 7, 0.0, 2);
        let mut effects = vec![shield(10), burn.clone()];
        absorb_with_shields(&mut effects, 4);
        assert_eq!(effects, vec![shield(6), burn]);
    }

    #[test]
    fn test_burn_refreshes_instead_of_stacking() {
        let mut effects = Vec::new();
        apply_stacked(&mut effects, StatusEffect::new(StatusEffectKind::Burn, 10, 0.0, 2));
        let outcome =
            apply_stacked(&mut effects, StatusEffect::new(StatusEffectKind::Burn, 4, 0.0, 5));

        assert_eq!(outcome, StackOutcome::Refreshed);
        assert_eq!(
            effects,
            vec![StatusEffect::new(StatusEffectKind::Burn, 4, 0.0, 5)]
        );
        assert_eq!(burn_total(&effects), 4);
    }

    #[rstest]
    #[case("equal magnitudes stack", 0.2, 0.2, StackOutcome::Stacked, 0.4)]
    #[case("weaker is discarded", 0.5, 0.3, StackOutcome::Discarded, 0.5)]
    #[case("stronger replaces", 0.3, 0.6, StackOutcome::Replaced, 0.6)]
    fn test_stat_modifier_stacking(
        #[case] desc: &str,
        #[case] first: f64,
        #[case] second: f64,
        #[case] expected: StackOutcome,
        #[case] total: f64,
    ) {
        let mut effects = Vec::new();
        apply_stacked(&mut effects, StatusEffect::new(StatusEffectKind::AtkUp, 0, first, 2));
        let outcome =
            apply_stacked(&mut effects, StatusEffect::new(StatusEffectKind::AtkUp, 0, second, 3));

        assert_eq!(outcome, expected, "{}", desc);
        assert!(
            (stat_modifier_sum(&effects, ModifiedStat::Attack) - total).abs() < 1e-9,
            "{}",
            desc
        );
    }

    #[test]
    fn test_replacement_swaps_only_the_matched_stack() {
        // Arrange
        let mut effects = vec![
            StatusEffect::new(StatusEffectKind::AtkUp, 0, 0.2, 2),
            shield(5),
            StatusEffect::new(StatusEffectKind::AtkUp, 0, 0.2, 1),
        ];

        // Act
        let outcome =
            apply_stacked(&mut effects, StatusEffect::new(StatusEffectKind::AtkUp, 0, 0.3, 4));

        // Assert
        assert_eq!(outcome, StackOutcome::Replaced);
        assert_eq!(
            effects,
            vec![
                StatusEffect::new(StatusEffectKind::AtkUp, 0, 0.3, 4),
                shield(5),
                StatusEffect::new(StatusEffectKind::AtkUp, 0, 0.2, 1),
            ]
        );
        assert!((stat_modifier_sum(&effects, ModifiedStat::Attack) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_up_and_down_modifiers_are_tracked_per_kind() {
        let mut effects = Vec::new();
        apply_stacked(&mut effects, StatusEffect::new(StatusEffectKind::AtkUp, 0, 0.3, 2));
        let outcome =
            apply_stacked(&mut effects, StatusEffect::new(StatusEffectKind::AtkDown, 0, 0.1, 2));

        assert_eq!(outcome, StackOutcome::Added);
        assert!((stat_modifier_sum(&effects, ModifiedStat::Attack) - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_tick_removes_effects_reaching_zero() {
        let mut effects = vec![
            StatusEffect::new(StatusEffectKind::Stun, 0, 0.0, 1),
            StatusEffect::new(StatusEffectKind::AtkUp, 0, 0.2, 2),
        ];

        let expired = tick_durations(&mut effects);

        assert_eq!(expired, vec![StatusEffectKind::Stun]);
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].duration_turns, 1);
        assert!(!has_active(&effects, StatusEffectKind::Stun));
    }
}
