use config::{Config, ConfigError, Environment, File};
use infrastructure::{HttpClientConfig, HttpServerConfig, MonitoringConfig};
use serde::Deserialize;

use crate::control::{ControlValueName, HttpSwitch};
use crate::demand::StateOfChargeDemand;
use crate::http::{HttpRead, HttpTransactionExecutor, HttpValidator, HttpWrite};
use crate::protocol::ContentProtocolType;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub monitoring: MonitoringConfig,
    pub http_server: HttpServerConfig,
    pub switch: SwitchSettings,
    pub ev: EvSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("config.toml"))
            .add_source(Environment::default().separator("__").list_separator(","));

        let s = builder.build()?;
        s.try_deserialize()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.switch.validate()?;
        self.ev.validate()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SwitchSettings {
    pub id: String,
    pub content_protocol: Option<ContentProtocolType>,
    #[serde(default)]
    pub http: HttpClientConfig,
    #[serde(default)]
    pub writes: Vec<HttpWrite>,
    pub read: Option<HttpRead>,
}

impl SwitchSettings {
    pub fn validate(&self) -> anyhow::Result<()> {
        let validator = HttpValidator::new(&self.id);

        validator.validate_writes(&ControlValueName::names(), &self.writes)?;
        validator.validate_read(
            &[ControlValueName::On.as_str()],
            self.read.as_ref(),
            self.content_protocol.is_some(),
        )?;

        Ok(())
    }

    pub fn new_switch(&self) -> anyhow::Result<HttpSwitch<HttpTransactionExecutor>> {
        let transport = HttpTransactionExecutor::new(self.http.clone())?;

        Ok(HttpSwitch::new(
            self.id.clone(),
            self.writes.clone(),
            self.read.clone(),
            self.content_protocol,
            transport,
        ))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EvSettings {
    pub id: Option<i32>,
    pub soc: Option<i32>,
    pub accept_control_recommendations: Option<bool>,
    #[serde(default = "default_update_interval_secs")]
    pub update_interval_secs: u64,
}

fn default_update_interval_secs() -> u64 {
    60
}

impl EvSettings {
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(soc) = self.soc {
            anyhow::ensure!((0..=100).contains(&soc), "Target SOC {}% out of range 0..=100", soc);
        }
        anyhow::ensure!(self.update_interval_secs > 0, "Update interval must be positive");

        Ok(())
    }

    pub fn new_demand(&self) -> StateOfChargeDemand {
        StateOfChargeDemand::new(self.soc, self.id, self.accept_control_recommendations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use config::FileFormat;

    const CONFIG: &str = r#"
        [monitoring]
        service_name = "charge-control"

        [monitoring.logs]
        default_level = "info"
        filters = ["charge_control=debug"]

        [http_server]
        port = 8080

        [switch]
        id = "F-00000001-000000000001-00"
        content_protocol = "JSON"

        [switch.http]
        username = "admin"
        password = "secret"
        timeout_secs = 5

        [[switch.writes]]
        url = "http://wallbox/cm?cmnd=Power%20On"
        values = [{ name = "On" }]

        [[switch.writes]]
        url = "http://wallbox/relay"
        values = [{ name = "Off", method = "POST", value = "turn=off" }]

        [switch.read]
        url = "http://wallbox/cm?cmnd=Power"
        values = [{ name = "On", path = "$.POWER" }]

        [ev]
        id = 1
        soc = 80
    "#;

    fn load(content: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn deserializes_full_configuration() {
        let settings = load(CONFIG);

        assert_eq!(settings.http_server.port, 8080);
        assert_eq!(settings.switch.content_protocol, Some(ContentProtocolType::Json));
        assert_eq!(settings.switch.writes.len(), 2);
        assert_eq!(settings.switch.writes[0].values[0].method, HttpMethod::Get);
        assert_eq!(settings.switch.writes[1].values[0].method, HttpMethod::Post);
        assert_eq!(settings.switch.writes[1].values[0].payload(), Some("turn=off"));
        assert_eq!(settings.switch.http.basic_auth(), Some(("admin", Some("secret"))));
        assert_eq!(settings.ev.soc, Some(80));
        assert_eq!(settings.ev.update_interval_secs, 60);

        assert!(settings.validate().is_ok());
    }

    #[test]
    fn rejects_read_without_path_for_json() {
        let mut settings = load(CONFIG);
        settings.switch.read.as_mut().unwrap().values[0].path = None;

        assert!(settings.validate().is_err());
    }

    #[test]
    fn rejects_target_soc_out_of_range() {
        let mut settings = load(CONFIG);
        settings.ev.soc = Some(120);

        assert!(settings.validate().is_err());
    }

    #[test]
    fn builds_demand_from_ev_settings() {
        let settings = load(CONFIG);

        let demand = settings.ev.new_demand();

        assert_eq!(demand.ev_id(), Some(1));
        assert_eq!(demand, StateOfChargeDemand::new(Some(80), Some(1), None));
    }
}
