use std::sync::{Arc, Mutex, PoisonError};

use actix_web::web::{self, Json};
use actix_web::{HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::control::{Control, HttpSwitch};
use crate::core::unit::WattHours;
use crate::demand::{EnergyDemand, SocSample, StateOfChargeDemand};
use crate::http::HttpTransport;
use crate::t;

struct ChargeControlApiState<T> {
    switch: Arc<HttpSwitch<T>>,
    demand: Arc<Mutex<StateOfChargeDemand>>,
}

pub fn new_routes<T>(switch: Arc<HttpSwitch<T>>, demand: Arc<Mutex<StateOfChargeDemand>>) -> actix_web::Scope
where
    T: HttpTransport + 'static,
{
    let state = ChargeControlApiState { switch, demand };
    web::scope("/api")
        .route("/ev/soc", web::put().to(handle_soc_changed::<T>))
        .route("/ev/demand", web::get().to(get_demand::<T>))
        .route("/switch", web::get().to(get_switch::<T>))
        .route("/switch", web::put().to(set_switch::<T>))
        .app_data(web::Data::new(state))
}

#[derive(Debug, Serialize)]
struct DemandDTO {
    ev_id: Option<i32>,
    enabled: bool,
    finished: bool,
    min_wh: Option<WattHours>,
    max_wh: Option<WattHours>,
    optional_energy: bool,
    accept_control_recommendations: Option<bool>,
    description: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct SwitchStateDTO {
    on: bool,
}

async fn handle_soc_changed<T: HttpTransport + 'static>(
    state: web::Data<ChargeControlApiState<T>>,
    Json(sample): Json<SocSample>,
) -> impl Responder {
    tracing::info!("Received SOC values {}", sample);

    if let Err(e) = sample.validate() {
        tracing::warn!("Rejecting SOC values: {}", e);
        return HttpResponse::BadRequest();
    }

    let mut demand = state.demand.lock().unwrap_or_else(PoisonError::into_inner);
    demand.on_observed_soc_changed(t!(now), sample);

    HttpResponse::NoContent()
}

async fn get_demand<T: HttpTransport + 'static>(state: web::Data<ChargeControlApiState<T>>) -> impl Responder {
    let now = t!(now);
    let demand = state.demand.lock().unwrap_or_else(PoisonError::into_inner);

    let dto = DemandDTO {
        ev_id: demand.ev_id(),
        enabled: demand.is_enabled(),
        finished: demand.is_finished(now),
        min_wh: demand.min(now),
        max_wh: demand.max(now),
        optional_energy: demand.is_using_optional_energy(),
        accept_control_recommendations: demand.is_accept_control_recommendations(),
        description: demand.to_string(),
    };

    HttpResponse::Ok().json(dto)
}

async fn get_switch<T: HttpTransport + 'static>(state: web::Data<ChargeControlApiState<T>>) -> impl Responder {
    let on = state.switch.is_on().await;
    HttpResponse::Ok().json(SwitchStateDTO { on })
}

async fn set_switch<T: HttpTransport + 'static>(
    state: web::Data<ChargeControlApiState<T>>,
    Json(dto): Json<SwitchStateDTO>,
) -> impl Responder {
    if state.switch.on(t!(now), dto.on).await {
        HttpResponse::NoContent()
    } else {
        tracing::warn!("Switching {} {} failed", state.switch.id(), if dto.on { "on" } else { "off" });
        HttpResponse::BadGateway()
    }
}
