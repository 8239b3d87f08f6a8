use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::{DemandLifecycle, EnergyDemand};
use crate::core::{time::DateTime, unit::WattHours};

const DEFAULT_CURRENT_SOC: i32 = 0;
const DEFAULT_TARGET_SOC: i32 = 100;

/// State of charge reading as reported by the charger, all values optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocSample {
    pub initial: Option<i32>,
    pub current: Option<i32>,
    pub battery_capacity: Option<i32>,
}

impl SocSample {
    pub fn new(initial: Option<i32>, current: Option<i32>, battery_capacity: Option<i32>) -> Self {
        Self {
            initial,
            current,
            battery_capacity,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, soc) in [("initial", self.initial), ("current", self.current)] {
            if let Some(soc) = soc {
                anyhow::ensure!((0..=100).contains(&soc), "{} SOC {}% out of range 0..=100", name, soc);
            }
        }
        if let Some(capacity) = self.battery_capacity {
            anyhow::ensure!(capacity >= 0, "Battery capacity {}Wh must not be negative", capacity);
        }

        Ok(())
    }
}

impl Display for SocSample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn opt(v: Option<i32>) -> String {
            v.map(|v| v.to_string()).unwrap_or_else(|| "?".to_string())
        }

        write!(
            f,
            "initial={}% current={}% batteryCapacity={}Wh",
            opt(self.initial),
            opt(self.current),
            opt(self.battery_capacity)
        )
    }
}

/// Demand to charge an electric vehicle up to a target state of charge.
///
/// The remaining energy is derived from the latest [`SocSample`] and is only recalculated
/// when a structurally different sample has been received since the last calculation.
/// Once no more energy is needed the demand disables itself and stays finished.
#[derive(Debug, Clone)]
pub struct StateOfChargeDemand {
    soc: Option<i32>,
    ev_id: Option<i32>,
    lifecycle: DemandLifecycle,
    received: SocSample,
    last_calculation: SocSample,
    battery_capacity: Option<i32>,
    energy: Option<WattHours>,
}

impl StateOfChargeDemand {
    pub fn new(soc: Option<i32>, ev_id: Option<i32>, accept_control_recommendations: Option<bool>) -> Self {
        Self {
            soc,
            ev_id,
            lifecycle: DemandLifecycle::new(accept_control_recommendations),
            received: SocSample::default(),
            last_calculation: SocSample::default(),
            battery_capacity: None,
            energy: None,
        }
    }

    pub fn ev_id(&self) -> Option<i32> {
        self.ev_id
    }

    pub fn energy(&self) -> Option<WattHours> {
        self.energy
    }

    fn target_soc_or_default(&self) -> i32 {
        self.soc.unwrap_or(DEFAULT_TARGET_SOC)
    }

    fn current_soc_or_default(&self) -> i32 {
        self.last_calculation.current.unwrap_or(DEFAULT_CURRENT_SOC)
    }

    /// Called by the charger whenever a fresh state of charge reading is available.
    pub fn on_observed_soc_changed(&mut self, now: DateTime, sample: SocSample) {
        tracing::debug!(ev_id = ?self.ev_id, %now, "Using updated SOC values: {}", sample);

        if !self.lifecycle.is_enabled_before() {
            self.set_enabled(true);
        }

        self.received = sample;
        self.update();
    }

    /// Energy needed to get from the current to the target state of charge, truncated
    /// toward zero. Negative once the target has been exceeded.
    pub fn calculate_energy(&self, battery_capacity: i32) -> WattHours {
        let current_soc = self.current_soc_or_default();
        let target_soc = self.target_soc_or_default();
        let energy = ((target_soc as f64 - current_soc as f64) / 100.0 * battery_capacity as f64) as i32;

        tracing::debug!(
            ev_id = ?self.ev_id,
            battery_capacity,
            current_soc,
            target_soc,
            "Energy calculation: {}Wh",
            energy
        );

        WattHours(energy)
    }

    fn no_energy_needed(&self) -> bool {
        self.energy.is_some_and(|energy| !energy.is_positive())
    }
}

impl EnergyDemand for StateOfChargeDemand {
    fn is_enabled(&self) -> bool {
        self.lifecycle.is_enabled()
    }

    fn set_enabled(&mut self, enabled: bool) {
        if self.lifecycle.set_enabled(enabled) {
            tracing::info!(ev_id = ?self.ev_id, "{} SOC request", if enabled { "Enabled" } else { "Disabled" });
        }
    }

    fn min(&self, _now: DateTime) -> Option<WattHours> {
        self.energy
    }

    fn max(&self, _now: DateTime) -> Option<WattHours> {
        self.energy
    }

    fn is_finished(&self, _now: DateTime) -> bool {
        self.no_energy_needed()
    }

    fn is_using_optional_energy(&self) -> bool {
        false
    }

    fn is_accept_control_recommendations(&self) -> Option<bool> {
        Some(self.lifecycle.accept_control_recommendations().unwrap_or(true))
    }

    fn update(&mut self) {
        if self.last_calculation != self.received {
            self.battery_capacity = self.received.battery_capacity.or(self.battery_capacity);
            self.last_calculation = self.received;

            match self.battery_capacity {
                Some(capacity) => self.energy = Some(self.calculate_energy(capacity)),
                None => tracing::warn!(ev_id = ?self.ev_id, "Battery capacity unknown, energy not calculated"),
            }
        }

        if self.no_energy_needed() {
            self.set_enabled(false);
        }
    }
}

impl PartialEq for StateOfChargeDemand {
    fn eq(&self, other: &Self) -> bool {
        self.target_soc_or_default() == other.target_soc_or_default()
            && self.ev_id == other.ev_id
            && self.energy == other.energy
    }
}

impl Display for StateOfChargeDemand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "evId={}/soc={}%=>{}%/energy={}",
            self.ev_id.map(|id| id.to_string()).unwrap_or_else(|| "none".to_string()),
            self.current_soc_or_default(),
            self.target_soc_or_default(),
            self.energy.unwrap_or(WattHours(0))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::t;

    fn sample(current: i32, battery_capacity: Option<i32>) -> SocSample {
        SocSample::new(Some(current), Some(current), battery_capacity)
    }

    #[test]
    fn no_energy_and_disabled_before_first_sample() {
        let mut demand = StateOfChargeDemand::new(Some(80), Some(1), None);
        demand.update();

        assert_eq!(demand.energy(), None);
        assert_eq!(demand.min(t!(now)), None);
        assert!(!demand.is_enabled());
        assert!(!demand.is_finished(t!(now)));
    }

    #[test]
    fn calculates_energy_to_target() {
        let mut demand = StateOfChargeDemand::new(Some(80), Some(1), None);

        demand.on_observed_soc_changed(t!(now), sample(20, Some(50000)));

        assert_eq!(demand.energy(), Some(WattHours(30000)));
        assert_eq!(demand.min(t!(now)), Some(WattHours(30000)));
        assert_eq!(demand.max(t!(now)), Some(WattHours(30000)));
        assert!(demand.is_enabled());
        assert!(!demand.is_finished(t!(now)));
    }

    #[test]
    fn target_reached_finishes_and_disables() {
        let mut demand = StateOfChargeDemand::new(Some(80), Some(1), None);

        demand.on_observed_soc_changed(t!(now), sample(80, Some(50000)));

        assert_eq!(demand.energy(), Some(WattHours(0)));
        assert!(demand.is_finished(t!(now)));
        assert!(!demand.is_enabled());
    }

    #[test]
    fn target_exceeded_yields_negative_energy_and_finishes() {
        let mut demand = StateOfChargeDemand::new(Some(80), Some(1), None);

        demand.on_observed_soc_changed(t!(now), sample(20, Some(50000)));
        assert!(demand.is_enabled());

        demand.on_observed_soc_changed(t!(now), sample(90, Some(50000)));

        assert_eq!(demand.energy(), Some(WattHours(-5000)));
        assert!(demand.is_finished(t!(now)));
        assert!(!demand.is_enabled());
    }

    #[test]
    fn missing_target_charges_to_full() {
        let mut demand = StateOfChargeDemand::new(None, Some(1), None);

        demand.on_observed_soc_changed(t!(now), sample(20, Some(50000)));

        assert_eq!(demand.energy(), Some(WattHours(40000)));
    }

    #[test]
    fn missing_current_soc_counts_as_empty() {
        let mut demand = StateOfChargeDemand::new(Some(80), Some(1), None);

        demand.on_observed_soc_changed(t!(now), SocSample::new(None, None, Some(50000)));

        assert_eq!(demand.energy(), Some(WattHours(40000)));
    }

    #[test]
    fn energy_is_truncated_toward_zero() {
        let demand = StateOfChargeDemand::new(Some(80), Some(1), None);
        assert_eq!(demand.calculate_energy(333), WattHours(266));

        let mut demand = StateOfChargeDemand::new(Some(80), Some(1), None);
        demand.on_observed_soc_changed(t!(now), sample(20, Some(333)));
        assert_eq!(demand.energy(), Some(WattHours(199)));

        demand.on_observed_soc_changed(t!(now), sample(90, Some(333)));
        assert_eq!(demand.energy(), Some(WattHours(-33)));
    }

    #[test]
    fn identical_samples_are_calculated_once() {
        let mut demand = StateOfChargeDemand::new(Some(80), Some(1), None);

        demand.on_observed_soc_changed(t!(now), sample(20, Some(50000)));
        assert_eq!(demand.energy(), Some(WattHours(30000)));

        demand.energy = Some(WattHours(1));
        for _ in 0..5 {
            demand.on_observed_soc_changed(t!(now), sample(20, Some(50000)));
            demand.update();
        }
        assert_eq!(demand.energy(), Some(WattHours(1)));

        demand.on_observed_soc_changed(t!(now), sample(30, Some(50000)));
        assert_eq!(demand.energy(), Some(WattHours(25000)));
    }

    #[test]
    fn battery_capacity_is_sticky_once_known() {
        let mut demand = StateOfChargeDemand::new(Some(80), Some(1), None);

        demand.on_observed_soc_changed(t!(now), sample(20, Some(50000)));
        demand.on_observed_soc_changed(t!(now), sample(50, None));

        assert_eq!(demand.energy(), Some(WattHours(15000)));
    }

    #[test]
    fn no_energy_without_battery_capacity() {
        let mut demand = StateOfChargeDemand::new(Some(80), Some(1), None);

        demand.on_observed_soc_changed(t!(now), sample(20, None));

        assert_eq!(demand.energy(), None);
        assert!(demand.is_enabled());
        assert!(!demand.is_finished(t!(now)));
    }

    #[test]
    fn sample_enables_only_once() {
        let mut demand = StateOfChargeDemand::new(Some(80), Some(1), None);

        demand.on_observed_soc_changed(t!(now), sample(20, Some(50000)));
        demand.on_observed_soc_changed(t!(now), sample(30, Some(50000)));
        assert!(demand.is_enabled());

        demand.on_observed_soc_changed(t!(now), sample(85, Some(50000)));
        assert!(!demand.is_enabled());
    }

    #[test]
    fn finished_demand_is_not_revived() {
        let mut demand = StateOfChargeDemand::new(Some(80), Some(1), None);

        demand.on_observed_soc_changed(t!(now), sample(85, Some(50000)));
        assert!(demand.is_finished(t!(now)));

        demand.on_observed_soc_changed(t!(now), sample(10, Some(50000)));

        assert!(!demand.is_enabled());
        assert_eq!(demand.energy(), Some(WattHours(35000)));
    }

    #[test]
    fn negative_current_soc_is_calculated_without_overflow() {
        let mut demand = StateOfChargeDemand::new(Some(80), Some(1), None);

        demand.on_observed_soc_changed(t!(now), SocSample::new(None, Some(-20), Some(50000)));
        assert_eq!(demand.energy(), Some(WattHours(50000)));

        demand.on_observed_soc_changed(t!(now), SocSample::new(None, Some(i32::MIN), Some(50000)));
        assert_eq!(demand.energy(), Some(WattHours(i32::MAX)));
    }

    #[test]
    fn sample_out_of_range_is_invalid() {
        assert!(SocSample::new(Some(0), Some(100), Some(50000)).validate().is_ok());
        assert!(SocSample::default().validate().is_ok());

        assert!(SocSample::new(None, Some(-20), Some(50000)).validate().is_err());
        assert!(SocSample::new(None, Some(i32::MIN), None).validate().is_err());
        assert!(SocSample::new(Some(101), Some(50), None).validate().is_err());
        assert!(SocSample::new(None, Some(50), Some(-1)).validate().is_err());
    }

    #[test]
    fn sample_is_copied_on_receive() {
        let mut demand = StateOfChargeDemand::new(Some(80), Some(1), None);
        let mut reading = sample(20, Some(50000));

        demand.on_observed_soc_changed(t!(now), reading);
        reading.current = Some(70);
        demand.update();

        assert_eq!(reading.current, Some(70));
        assert_eq!(demand.energy(), Some(WattHours(30000)));
    }

    #[test]
    fn flags() {
        let demand = StateOfChargeDemand::new(Some(80), Some(1), None);
        assert!(!demand.is_using_optional_energy());
        assert_eq!(demand.is_accept_control_recommendations(), Some(true));

        let demand = StateOfChargeDemand::new(Some(80), Some(1), Some(false));
        assert_eq!(demand.is_accept_control_recommendations(), Some(false));
    }

    #[test]
    fn equality_on_target_vehicle_and_energy() {
        let mut a = StateOfChargeDemand::new(None, Some(1), None);
        let mut b = StateOfChargeDemand::new(Some(100), Some(1), Some(false));
        assert_eq!(a, b);

        a.on_observed_soc_changed(t!(now), sample(20, Some(50000)));
        assert_ne!(a, b);

        b.on_observed_soc_changed(t!(now), sample(20, Some(50000)));
        assert_eq!(a, b);

        let c = StateOfChargeDemand::new(None, Some(2), None);
        assert_ne!(StateOfChargeDemand::new(None, Some(1), None), c);
    }

    #[test]
    fn display_contains_vehicle_soc_and_energy() {
        let mut demand = StateOfChargeDemand::new(Some(80), Some(7), None);
        demand.on_observed_soc_changed(t!(now), sample(20, Some(50000)));

        let text = demand.to_string();

        assert!(text.contains("evId=7"), "{}", text);
        assert!(text.contains("20%=>80%"), "{}", text);
        assert!(text.contains("30000Wh"), "{}", text);
    }
}
