use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use settings::Settings;

use crate::control::Control;
use crate::core::time::DateTime;
use crate::demand::{EnergyDemand, StateOfChargeDemand};

mod adapter;
mod control;
mod core;
mod demand;
mod http;
mod protocol;
mod settings;

#[tokio::main(flavor = "multi_thread")]
pub async fn main() {
    let settings = Settings::new().expect("Error reading configuration");

    settings.monitoring.init().expect("Error initializing monitoring");

    if let Err(e) = settings.validate() {
        tracing::error!("Terminating because of incorrect configuration: {:#}", e);
        std::process::exit(1);
    }

    let switch = Arc::new(
        settings
            .switch
            .new_switch()
            .expect("Error initializing HTTP switch"),
    );
    let demand = Arc::new(Mutex::new(settings.ev.new_demand()));
    let update_interval = Duration::from_secs(settings.ev.update_interval_secs);

    {
        let switch_id = switch.id().to_owned();
        switch.add_control_state_changed_listener(Arc::new(move |now: DateTime, switch_on: bool| {
            tracing::info!("{}: switched {} at {}", switch_id, if switch_on { "on" } else { "off" }, now);
        }));
    }

    let http_server_exec = {
        let switch = switch.clone();
        let demand = demand.clone();

        async move {
            settings
                .http_server
                .run_server(move || vec![adapter::http_api::new_routes(switch.clone(), demand.clone())])
                .await
                .expect("HTTP server execution failed");
        }
    };

    tracing::info!("Starting main loop");

    tokio::select!(
        _ = keep_demand_updated(demand, update_interval) => {},
        _ = http_server_exec => {},
    );
}

async fn keep_demand_updated(demand: Arc<Mutex<StateOfChargeDemand>>, every: Duration) {
    let mut timer = tokio::time::interval(every);

    loop {
        timer.tick().await;

        let now = t!(now);
        let mut demand = demand.lock().unwrap_or_else(PoisonError::into_inner);
        demand.update();

        tracing::debug!(
            enabled = demand.is_enabled(),
            finished = demand.is_finished(now),
            "Demand {}",
            demand
        );
    }
}
