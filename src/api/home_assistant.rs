//! Home Assistant [REST API](https://developers.home-assistant.io/docs/api/rest/) client.

use std::time::Duration;

use http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::prelude::*;

pub struct Api {
    client: Client,
    base_url: Url,
}

impl Api {
    /// Create a client for the base URL, for example: `http://localhost:8123/api`.
    pub fn new(access_token: &str, base_url: Url) -> Result<Self> {
        ensure!(!base_url.cannot_be_a_base(), "`{base_url}` cannot be used as a base URL");
        let mut authorization = HeaderValue::from_str(&format!("Bearer {access_token}"))?;
        authorization.set_sensitive(true);
        let client = Client::builder()
            .default_headers(HeaderMap::from_iter([(AUTHORIZATION, authorization)]))
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Create or overwrite the entity state.
    #[instrument(skip_all, fields(entity_id = entity_id))]
    pub async fn set_state(&self, entity_id: &str, state: &EntityState) -> Result {
        debug!(state = %state.state, "setting…");
        self.post(&["states", entity_id], state).await
    }

    #[instrument(skip_all, fields(notification_id = %notification.notification_id))]
    pub async fn create_notification(&self, notification: &Notification) -> Result {
        info!(title = %notification.title, "notifying…");
        self.post(&["services", "persistent_notification", "create"], notification).await
    }

    #[instrument(skip_all, fields(notification_id = notification_id))]
    pub async fn dismiss_notification(&self, notification_id: &str) -> Result {
        info!("dismissing…");
        let body = serde_json::json!({ "notification_id": notification_id });
        self.post(&["services", "persistent_notification", "dismiss"], &body).await
    }

    async fn post<B: Serialize + Sync>(&self, segments: &[&str], body: &B) -> Result {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("invalid base URL"))?
            .pop_if_empty()
            .extend(segments);
        self.client
            .post(url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("failed to call `{}`", segments.join("/")))?
            .error_for_status()
            .with_context(|| format!("`{}` failed", segments.join("/")))?;
        Ok(())
    }
}

/// State as pushed to `POST /api/states/<entity_id>`.
#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EntityState {
    pub state: String,
    pub attributes: Map<String, Value>,
}

impl EntityState {
    pub const UNAVAILABLE: &'static str = "unavailable";

    pub fn new(state: impl Into<String>) -> Self {
        Self { state: state.into(), attributes: Map::new() }
    }

    pub fn unavailable() -> Self {
        Self::new(Self::UNAVAILABLE)
    }

    pub fn with_attribute(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    #[cfg(test)]
    pub fn is_unavailable(&self) -> bool {
        self.state == Self::UNAVAILABLE
    }
}

/// Payload of the `persistent_notification.create` service.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub notification_id: String,
    pub title: String,
    pub message: String,
}
