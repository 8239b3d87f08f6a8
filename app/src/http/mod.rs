mod executor;
mod validator;

pub use executor::HttpTransactionExecutor;
pub use validator::HttpValidator;

use derive_more::Display;
use serde::Deserialize;

pub const STATUS_OK: u16 = 200;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    #[display("GET")]
    Get,
    #[display("POST")]
    Post,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Executes a single request. `None` means no response was received at all.
pub trait HttpTransport {
    async fn execute(&self, method: HttpMethod, url: &str, data: Option<&str>) -> Option<HttpResponse>;
}

/// Request sent to change a device. One URL may serve several named values.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpWrite {
    pub url: String,
    #[serde(default)]
    pub values: Vec<HttpWriteValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpWriteValue {
    pub name: String,
    #[serde(default)]
    pub method: HttpMethod,
    pub value: Option<String>,
}

impl HttpWriteValue {
    //payload is only sent with POST
    pub fn payload(&self) -> Option<&str> {
        match self.method {
            HttpMethod::Post => self.value.as_deref(),
            HttpMethod::Get => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpRead {
    pub url: String,
    #[serde(default)]
    pub values: Vec<HttpReadValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpReadValue {
    pub name: String,
    pub path: Option<String>,
}

pub fn find_write<'a>(name: &str, writes: &'a [HttpWrite]) -> Option<(&'a HttpWrite, &'a HttpWriteValue)> {
    writes
        .iter()
        .find_map(|write| write.values.iter().find(|v| v.name == name).map(|v| (write, v)))
}

pub fn find_read<'a>(name: &str, read: Option<&'a HttpRead>) -> Option<(&'a HttpRead, &'a HttpReadValue)> {
    let read = read?;
    read.values.iter().find(|v| v.name == name).map(|v| (read, v))
}
