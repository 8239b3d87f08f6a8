mod lifecycle;
mod soc;

pub use lifecycle::DemandLifecycle;
pub use soc::{SocSample, StateOfChargeDemand};

use crate::core::{time::DateTime, unit::WattHours};

/// Energy still required by a flexible load, as seen by the scheduler.
///
/// The scheduler polls the getters every tick and calls [`EnergyDemand::update`] before
/// doing so. All operations are plain computations over local state.
pub trait EnergyDemand {
    fn is_enabled(&self) -> bool;

    /// Idempotent. Only an actual transition has side effects.
    fn set_enabled(&mut self, enabled: bool);

    /// Lower bound of the energy still required as of `now`.
    fn min(&self, now: DateTime) -> Option<WattHours>;

    /// Upper bound of the energy still required as of `now`.
    fn max(&self, now: DateTime) -> Option<WattHours>;

    fn is_finished(&self, now: DateTime) -> bool;

    /// Whether surplus energy (not guaranteed) may be used to satisfy this demand.
    fn is_using_optional_energy(&self) -> bool;

    /// Whether a scheduler recommendation may override direct switch requests.
    fn is_accept_control_recommendations(&self) -> Option<bool>;

    fn update(&mut self);
}
