mod watt_hours;

pub use watt_hours::WattHours;
