//! The pull side of synchronization: point reads and writes against
//! property resources.
//!
//! The wire contract per resource: READ returns a `{property: value}`
//! body; WRITE accepts a single-field body and succeeds with exactly
//! status 200. Both carry bearer auth. The trait seam exists so the
//! engine can be exercised against a recording fake.

use async_trait::async_trait;
use compact_str::{CompactString, ToCompactString};
use reqwest::{
    StatusCode, Url,
    header::{ACCEPT, AUTHORIZATION},
};
use serde_json::{Map, Value as Json};

use crate::Result;

pub type StatusBody = Map<String, Json>;

#[async_trait]
pub trait Transport: Send + Sync {
    /// Read one property resource; the body maps property names to raw
    /// wire values.
    async fn read(&self, resource: &Url) -> Result<StatusBody>;

    /// Write one property resource and return the response status.
    async fn write(&self, resource: &Url, body: &Json) -> Result<u16>;
}

pub struct HttpTransport {
    http: reqwest::Client,
    bearer: CompactString,
}

impl HttpTransport {
    pub fn new(http: reqwest::Client, token: &str) -> Self {
        Self { http, bearer: format!("Bearer {token}").to_compact_string() }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn read(&self, resource: &Url) -> Result<StatusBody> {
        let body = self
            .http
            .get(resource.clone())
            .header(AUTHORIZATION, self.bearer.as_str())
            .header(ACCEPT, "application/json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(body)
    }

    async fn write(&self, resource: &Url, body: &Json) -> Result<u16> {
        let response = self
            .http
            .put(resource.clone())
            .header(AUTHORIZATION, self.bearer.as_str())
            .json(body)
            .send()
            .await?;

        let status: StatusCode = response.status();
        Ok(status.as_u16())
    }
}
