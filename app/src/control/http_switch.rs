use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::{Control, ControlStateChangedListener, ControlValueName, ListenerRegistry};
use crate::core::time::DateTime;
use crate::http::{HttpMethod, HttpRead, HttpReadValue, HttpTransport, HttpWrite, find_read, find_write};
use crate::protocol::{
    ContentProtocolHandler, ContentProtocolType, JsonContentProtocolHandler, PlainTextProtocolHandler,
};

/// Changes the on/off state of a device by sending HTTP requests.
///
/// The last state confirmed by the device is cached. Without a configured read the cache
/// is all there is, so it will not notice if the device is switched by other means.
pub struct HttpSwitch<T> {
    id: String,
    writes: Vec<HttpWrite>,
    read: Option<HttpRead>,
    content_protocol: Option<ContentProtocolType>,
    transport: T,
    on: AtomicBool,
    listeners: ListenerRegistry,
}

impl<T: HttpTransport> HttpSwitch<T> {
    pub fn new(
        id: impl Into<String>,
        writes: Vec<HttpWrite>,
        read: Option<HttpRead>,
        content_protocol: Option<ContentProtocolType>,
        transport: T,
    ) -> Self {
        Self {
            id: id.into(),
            writes,
            read,
            content_protocol,
            transport,
            on: AtomicBool::new(false),
            listeners: ListenerRegistry::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    fn content_protocol_handler(&self) -> &'static dyn ContentProtocolHandler {
        match self.content_protocol {
            Some(ContentProtocolType::Json) => &JsonContentProtocolHandler,
            None => &PlainTextProtocolHandler,
        }
    }

    async fn read_state(&self, read: &HttpRead, value: &HttpReadValue) -> Option<bool> {
        let response = self.transport.execute(HttpMethod::Get, &read.url, None).await?;

        if !response.is_ok() {
            tracing::warn!(id = %self.id, "Reading state failed with status {}", response.status);
            return None;
        }

        self.content_protocol_handler()
            .extract_boolean(&response.body, value.path.as_deref())
    }
}

impl<T: HttpTransport> Control for HttpSwitch<T> {
    async fn is_on(&self) -> bool {
        if let Some((read, value)) = find_read(ControlValueName::On.as_str(), self.read.as_ref()) {
            match self.read_state(read, value).await {
                Some(on) => return on,
                None => tracing::warn!(id = %self.id, "State not readable, using last known state"),
            }
        }

        self.on.load(Ordering::SeqCst)
    }

    #[tracing::instrument(skip(self), fields(id = %self.id))]
    async fn on(&self, now: DateTime, switch_on: bool) -> bool {
        tracing::info!("Switching {}", if switch_on { "on" } else { "off" });

        let value_name = ControlValueName::from(switch_on);
        let Some((write, value)) = find_write(value_name.as_str(), &self.writes) else {
            tracing::debug!("No write configured for {}", value_name);
            return false;
        };

        let Some(response) = self.transport.execute(value.method, &write.url, value.payload()).await else {
            return false;
        };

        if !response.is_ok() {
            tracing::warn!("Switching {} rejected with status {}", value_name, response.status);
            return false;
        }

        self.on.store(switch_on, Ordering::SeqCst);
        self.listeners.notify(now, switch_on);

        true
    }

    fn add_control_state_changed_listener(&self, listener: Arc<dyn ControlStateChangedListener>) {
        self.listeners.add(listener);
    }

    fn remove_control_state_changed_listener(&self, listener: &Arc<dyn ControlStateChangedListener>) {
        self.listeners.remove(listener);
    }
}
