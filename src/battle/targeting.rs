use crate::battle::rng::BattleRng;
use crate::battle::state::{Battlefield, UnitRef};
use ordered_float::OrderedFloat;
use schema::{Row, TargetPattern};
use std::cmp::Reverse;

/// Maps `pattern` to a concrete target list for `actor`.
///
/// Only living combatants are ever returned. Single-target patterns honor a
/// manual pick when it is alive and inside the pattern's pool, otherwise they
/// draw uniformly from the pool; an empty pool yields an empty list without
/// consuming a roll.
pub fn resolve_targets(
    pattern: TargetPattern,
    actor: UnitRef,
    field: &Battlefield,
    rng: &mut dyn BattleRng,
    manual_target: Option<UnitRef>,
) -> Vec<UnitRef> {
    let enemies = field.living(actor.side.opponent());

    match pattern {
        TargetPattern::SelfOnly => {
            if field.is_alive(actor) {
                vec![actor]
            } else {
                Vec::new()
            }
        }
        TargetPattern::SingleEnemy => pick_single(&enemies, rng, manual_target),
        TargetPattern::SingleAlly => {
            let allies = field.living_allies_excluding(actor);
            pick_single(&allies, rng, manual_target)
        }
        TargetPattern::AllEnemies => enemies,
        TargetPattern::AllAllies => field.living_allies_excluding(actor),
        TargetPattern::LowestHpEnemy => enemies
            .iter()
            .copied()
            .min_by_key(|u| field.get(*u).map_or(i32::MAX, |c| c.current_hp()))
            .into_iter()
            .collect(),
        TargetPattern::HighestThreatEnemy => enemies
            .iter()
            .copied()
            // min_by_key keeps the first of equal keys, so ties go to roster order
            .min_by_key(|u| Reverse(OrderedFloat(threat(field, *u))))
            .into_iter()
            .collect(),
        TargetPattern::FrontRowSingle => {
            pick_single(&in_row(field, &enemies, Row::Front), rng, manual_target)
        }
        TargetPattern::BackRowSingle => {
            pick_single(&in_row(field, &enemies, Row::Back), rng, manual_target)
        }
        TargetPattern::FrontRowAll => in_row(field, &enemies, Row::Front),
        TargetPattern::BackRowAll => in_row(field, &enemies, Row::Back),
        // Formation columns are not modeled yet.
        TargetPattern::ColumnSingle | TargetPattern::ColumnAll => pick_single(&enemies, rng, None),
    }
}

/// `ATK × (currentHP / maxHP)`.
pub fn threat(field: &Battlefield, unit: UnitRef) -> f64 {
    field
        .get(unit)
        .map_or(0.0, |c| c.current_atk() as f64 * c.hp_ratio())
}

fn in_row(field: &Battlefield, pool: &[UnitRef], row: Row) -> Vec<UnitRef> {
    pool.iter()
        .copied()
        .filter(|u| field.get(*u).is_some_and(|c| c.position.row == row))
        .collect()
}

fn pick_single(
    pool: &[UnitRef],
    rng: &mut dyn BattleRng,
    manual_target: Option<UnitRef>,
) -> Vec<UnitRef> {
    if let Some(target) = manual_target.filter(|t| pool.contains(t)) {
        return vec![target];
    }
    if pool.is_empty() {
        return Vec::new();
    }
    vec![pool[rng.pick_index(pool.len())]]
}
