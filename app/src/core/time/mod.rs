mod builder;
mod datetime;

pub use datetime::DateTime;

#[cfg(test)]
pub use datetime::FIXED_NOW;
