use serde::{Deserialize, Serialize};

/// Percentage that converts into one whole energy point.
pub const BAR_PERCENT_PER_POINT: f64 = 100.0;

/// A team's shared ultimate resource.
///
/// `energy` stays in `[0, max_energy]`; `bar_percent` stays in `[0, 100)` and
/// carries partial progress across hits and turns.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TeamEnergyLedger {
    energy: i32,
    max_energy: i32,
    bar_percent: f64,
}

impl TeamEnergyLedger {
    pub fn new(max_energy: i32, start_energy: i32) -> Self {
        let max_energy = max_energy.max(0);
        Self {
            energy: start_energy.clamp(0, max_energy),
            max_energy,
            bar_percent: 0.0,
        }
    }

    pub fn energy(&self) -> i32 {
        self.energy
    }

    pub fn max_energy(&self) -> i32 {
        self.max_energy
    }

    pub fn bar_percent(&self) -> f64 {
        self.bar_percent
    }

    /// Adds up to `amount`, clamped at the max. Returns what was admitted.
    pub fn gain_energy(&mut self, amount: i32) -> i32 {
        if amount <= 0 {
            return 0;
        }
        let before = self.energy;
        self.energy = before.saturating_add(amount).min(self.max_energy);
        self.energy - before
    }

    /// Spends `amount` if affordable. Non-positive amounts always succeed.
    pub fn try_spend_energy(&mut self, amount: i32) -> bool {
        if amount <= 0 {
            return true;
        }
        if self.energy < amount {
            return false;
        }
        self.energy -= amount;
        true
    }

    /// Fills the bar by `percent` and converts every whole 100% into energy.
    ///
    /// Returns the energy actually admitted, which can be less than the
    /// nominal conversion when the pool is near its max. The bar is reduced
    /// by the full converted percentage either way.
    pub fn add_to_bar_and_convert(&mut self, percent: f64) -> i32 {
        if !percent.is_finite() || percent <= 0.0 {
            return 0;
        }
        self.bar_percent += percent;

        let mut admitted = 0;
        while self.bar_percent >= BAR_PERCENT_PER_POINT {
            let points = (self.bar_percent / BAR_PERCENT_PER_POINT).floor();
            admitted += self.gain_energy(points as i32);
            self.bar_percent -= points * BAR_PERCENT_PER_POINT;
        }
        self.bar_percent = self.bar_percent.max(0.0);
        admitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_bar_conversion_carries_remainder() {
        let mut ledger = TeamEnergyLedger::new(10, 0);

        assert_eq!(ledger.add_to_bar_and_convert(250.0), 2);
        assert_eq!(ledger.energy(), 2);
        assert!((ledger.bar_percent() - 50.0).abs() < 1e-9);

        assert_eq!(ledger.add_to_bar_and_convert(60.0), 1);
        assert!((ledger.bar_percent() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_bar_conversion_reports_only_admitted_energy() {
        let mut ledger = TeamEnergyLedger::new(5, 4);

        assert_eq!(ledger.add_to_bar_and_convert(330.0), 1);
        assert_eq!(ledger.energy(), 5);
        assert!((ledger.bar_percent() - 30.0).abs() < 1e-9);
    }

    #[rstest]
    #[case("gain within bounds", 0, 3, 3, 3)]
    #[case("gain is clamped at max", 8, 5, 2, 10)]
    #[case("zero gain is a no-op", 4, 0, 0, 4)]
    #[case("negative gain is a no-op", 4, -3, 0, 4)]
    fn test_gain_energy(
        #[case] desc: &str,
        #[case] start: i32,
        #[case] gain: i32,
        #[case] admitted: i32,
        #[case] after: i32,
    ) {
        let mut ledger = TeamEnergyLedger::new(10, start);
        assert_eq!(ledger.gain_energy(gain), admitted, "{}", desc);
        assert_eq!(ledger.energy(), after, "{}", desc);
    }

    #[test]
    fn test_spend_fails_without_mutation_when_short() {
        let mut ledger = TeamEnergyLedger::new(10, 2);
        assert!(!ledger.try_spend_energy(3));
        assert_eq!(ledger.energy(), 2);
        assert!(ledger.try_spend_energy(2));
        assert_eq!(ledger.energy(), 0);
        assert!(ledger.try_spend_energy(0));
        assert!(ledger.try_spend_energy(-1));
        assert_eq!(ledger.energy(), 0);
    }

    #[test]
    fn test_start_energy_is_clamped() {
        assert_eq!(TeamEnergyLedger::new(3, 9).energy(), 3);
        assert_eq!(TeamEnergyLedger::new(3, -2).energy(), 0);
    }
}
