use crate::battle::state::{Battlefield, UnitRef};
use std::collections::VecDeque;

/// Rolling speed-ordered queue of living combatants.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnTimeline {
    queue: VecDeque<UnitRef>,
}

impl TurnTimeline {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Living combatants by SPD descending. Equal speeds keep `units` order.
    pub fn rebuild(&mut self, field: &Battlefield, units: &[UnitRef]) {
        let mut living: Vec<UnitRef> = units
            .iter()
            .copied()
            .filter(|u| field.is_alive(*u))
            .collect();
        // sort_by_key is stable
        living.sort_by_key(|u| std::cmp::Reverse(field.get(*u).map_or(0, |c| c.speed())));
        self.queue = living.into();
    }

    /// Moves `actor` to the back, or drops it if it died during its action.
    pub fn roll_after_action(&mut self, actor: UnitRef, field: &Battlefield) {
        if self.queue.front() == Some(&actor) {
            self.queue.pop_front();
        } else if let Some(position) = self.queue.iter().position(|u| *u == actor) {
            self.queue.remove(position);
        }
        if field.is_alive(actor) {
            self.queue.push_back(actor);
        }
    }

    pub fn remove_dead_units(&mut self, field: &Battlefield) {
        self.queue.retain(|u| field.is_alive(*u));
    }

    pub fn current_actor(&self) -> Option<UnitRef> {
        self.queue.front().copied()
    }

    pub fn order(&self) -> Vec<UnitRef> {
        self.queue.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
