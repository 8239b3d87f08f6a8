mod http_switch;
mod listener;

pub use http_switch::HttpSwitch;
pub use listener::{ControlStateChangedListener, ListenerRegistry};

use std::sync::Arc;

use derive_more::Display;

use crate::core::time::DateTime;

/// Logical values a switch can be written with, matched by name against the configured
/// HTTP writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ControlValueName {
    On,
    Off,
}

impl ControlValueName {
    pub const ALL: [ControlValueName; 2] = [ControlValueName::On, ControlValueName::Off];

    pub fn as_str(&self) -> &'static str {
        match self {
            ControlValueName::On => "On",
            ControlValueName::Off => "Off",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|name| name.as_str()).collect()
    }
}

impl From<bool> for ControlValueName {
    fn from(switch_on: bool) -> Self {
        if switch_on {
            ControlValueName::On
        } else {
            ControlValueName::Off
        }
    }
}

/// Switches a device on and off.
///
/// Failures are only reported as `false`. Nothing is retried here, that is up to the
/// caller.
pub trait Control {
    async fn is_on(&self) -> bool;

    async fn on(&self, now: DateTime, switch_on: bool) -> bool;

    fn add_control_state_changed_listener(&self, listener: Arc<dyn ControlStateChangedListener>);

    fn remove_control_state_changed_listener(&self, listener: &Arc<dyn ControlStateChangedListener>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_name_from_switch_state() {
        assert_eq!(ControlValueName::from(true), ControlValueName::On);
        assert_eq!(ControlValueName::from(false), ControlValueName::Off);
        assert_eq!(ControlValueName::On.to_string(), ControlValueName::On.as_str());
        assert_eq!(ControlValueName::names(), vec!["On", "Off"]);
    }
}
