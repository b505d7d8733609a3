//! Client-side synchronization engine for remote smart-home devices.
//!
//! Each entity mirrors one remote device: a store of typed property
//! values kept consistent across an asynchronous push channel and
//! on-demand batched pulls, capability modules deriving display state
//! from the store, and per-property detail bindings driven through an
//! abstract view renderer.

use std::{sync::Arc, time::Duration};

use compact_str::{CompactString, ToCompactString};
use reqwest::Url;
use tokio_tungstenite::tungstenite;

use crate::{
    detail::Renderer,
    transport::{HttpTransport, Transport},
};

pub mod capability;
pub mod detail;
pub mod entity;
pub mod log;
pub mod push;
pub mod registry;
pub mod store;
pub mod transport;

pub use lantern_common as common;

pub use crate::{
    entity::{Entity, RenderMode},
    push::Backoff,
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),
    #[error("serde json error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("bad resource href: {0}")]
    BadHref(String),
    #[error("unknown property '{0}'")]
    UnknownProperty(CompactString),
    #[error("property '{0}' has no writable resource")]
    NotWritable(CompactString),
    #[error("write to '{name}' rejected with status {status}")]
    WriteRejected { name: CompactString, status: u16 },
    #[error(transparent)]
    Value(#[from] lantern_common::ValueError),
}

/// Tuning knobs for a session's transports.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Re-pull tracked properties at this interval to bound staleness
    /// after missed pushes. `None` disables periodic resync.
    pub resync_interval: Option<Duration>,
    /// Reconnect backoff bounds for the push channel.
    pub reconnect: Backoff,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            resync_interval: Some(Duration::from_secs(60)),
            reconnect: Backoff::default(),
        }
    }
}

/// Shared context for every transport call: the gateway origin, the
/// bearer token, the HTTP client, and transport tuning. Entities hold
/// an `Arc` of their session.
pub struct Session {
    origin: Url,
    token: CompactString,
    transport: Arc<dyn Transport>,
    options: SessionOptions,
}

impl Session {
    pub fn new(origin: &str, token: &str) -> Result<Arc<Self>> {
        Self::with_options(origin, token, SessionOptions::default())
    }

    pub fn with_options(origin: &str, token: &str, options: SessionOptions) -> Result<Arc<Self>> {
        let origin = Url::parse(origin).map_err(|e| Error::BadHref(e.to_string()))?;
        let transport = Arc::new(HttpTransport::new(reqwest::Client::new(), token));

        Ok(Arc::new(Session {
            origin,
            token: token.to_compact_string(),
            transport,
            options,
        }))
    }

    /// Construct the live view of one device from its description.
    pub fn entity(
        self: &Arc<Self>,
        description: &lantern_common::DeviceDescription,
        mode: RenderMode,
        renderer: Box<dyn Renderer>,
    ) -> Result<Entity> {
        Entity::new(self.clone(), self.transport(), description, mode, renderer)
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub(crate) fn transport(&self) -> Arc<dyn Transport> {
        self.transport.clone()
    }

    /// Resolve a description href against the gateway origin.
    pub(crate) fn resource(&self, href: &str) -> Result<Url> {
        self.origin.join(href).map_err(|e| Error::BadHref(e.to_string()))
    }

    /// The realtime endpoint for a base locator: same resource, scheme
    /// swapped to its websocket equivalent, token as a query parameter.
    pub(crate) fn realtime_endpoint(&self, base: &Url) -> Result<Url> {
        let scheme = match base.scheme() {
            "http" => "ws",
            "https" => "wss",
            other => {
                return Err(Error::BadHref(format!("no realtime equivalent for '{other}'")));
            }
        };

        let mut endpoint = base.clone();
        endpoint
            .set_scheme(scheme)
            .map_err(|()| Error::BadHref(format!("cannot swap scheme on '{base}'")))?;
        endpoint.query_pairs_mut().append_pair("jwt", &self.token);

        Ok(endpoint)
    }
}
