/// Enabled state shared by all demand kinds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemandLifecycle {
    enabled: bool,
    enabled_before: bool,
    accept_control_recommendations: Option<bool>,
}

impl DemandLifecycle {
    pub fn new(accept_control_recommendations: Option<bool>) -> Self {
        Self {
            accept_control_recommendations,
            ..Default::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// True once the demand has been enabled at least once.
    pub fn is_enabled_before(&self) -> bool {
        self.enabled_before
    }

    /// Returns whether the state actually changed.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        if self.enabled == enabled {
            return false;
        }

        self.enabled = enabled;
        if enabled {
            self.enabled_before = true;
        }

        true
    }

    pub fn accept_control_recommendations(&self) -> Option<bool> {
        self.accept_control_recommendations
    }
}
