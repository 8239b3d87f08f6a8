use derive_more::{Display, Error};

use super::{HttpRead, HttpWrite};

#[derive(Debug, Display, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[display("{id}: at least one HTTP write has to be configured")]
    NoWrite { id: String },
    #[display("{id}: URL missing")]
    MissingUrl { id: String },
    #[display("{id}: no values configured for {url}")]
    NoValues { id: String, url: String },
    #[display("{id}: invalid value name {name}, expected one of {expected}")]
    InvalidValueName { id: String, name: String, expected: String },
    #[display("{id}: path required for value {name}")]
    MissingPath { id: String, name: String },
}

/// Checks HTTP configuration at startup. Anything rejected here is fatal.
pub struct HttpValidator<'a> {
    id: &'a str,
}

impl<'a> HttpValidator<'a> {
    pub fn new(id: &'a str) -> Self {
        Self { id }
    }

    pub fn validate_writes(&self, value_names: &[&str], writes: &[HttpWrite]) -> Result<(), ValidationError> {
        if writes.is_empty() {
            return Err(ValidationError::NoWrite { id: self.id.to_owned() });
        }

        for write in writes {
            self.validate_url(&write.url)?;

            if write.values.is_empty() {
                return Err(ValidationError::NoValues {
                    id: self.id.to_owned(),
                    url: write.url.clone(),
                });
            }

            for value in &write.values {
                self.validate_value_name(value_names, &value.name)?;
            }
        }

        Ok(())
    }

    pub fn validate_read(
        &self,
        value_names: &[&str],
        read: Option<&HttpRead>,
        path_required: bool,
    ) -> Result<(), ValidationError> {
        let Some(read) = read else {
            return Ok(());
        };

        self.validate_url(&read.url)?;

        if read.values.is_empty() {
            return Err(ValidationError::NoValues {
                id: self.id.to_owned(),
                url: read.url.clone(),
            });
        }

        for value in &read.values {
            self.validate_value_name(value_names, &value.name)?;

            let has_path = value.path.as_deref().is_some_and(|p| !p.trim().is_empty());
            if path_required && !has_path {
                return Err(ValidationError::MissingPath {
                    id: self.id.to_owned(),
                    name: value.name.clone(),
                });
            }
        }

        Ok(())
    }

    fn validate_url(&self, url: &str) -> Result<(), ValidationError> {
        if url.trim().is_empty() {
            return Err(ValidationError::MissingUrl { id: self.id.to_owned() });
        }
        Ok(())
    }

    fn validate_value_name(&self, value_names: &[&str], name: &str) -> Result<(), ValidationError> {
        if !value_names.contains(&name) {
            return Err(ValidationError::InvalidValueName {
                id: self.id.to_owned(),
                name: name.to_owned(),
                expected: value_names.join(","),
            });
        }
        Ok(())
    }
}
