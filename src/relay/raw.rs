use super::{ensure_success, Delivery, Relay};
use crate::{Event, Result};
use reqwest::{header, Client, Url};

/// Content type of events sent by the [`Raw`] relay
pub const RAW_CONTENT_TYPE: &str = "application/cloudevents+json; charset=UTF-8";

/// A [`Relay`] that POSTs the event JSON once, without retrying
#[derive(Debug, Clone)]
pub struct Raw {
    client: Client,
    url: Url,
}

impl Raw {
    /// Creates an instance of [`Raw`] [`Relay`]
    pub fn new(url: Url) -> Result<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            url,
        })
    }
}

impl Relay for Raw {
    async fn transport(&self, event: &Event) -> Result<Delivery> {
        let body = serde_json::to_vec(event)?;

        tracing::debug!(url = %self.url, %event, "Sending event");

        let response = self
            .client
            .post(self.url.clone())
            .header(header::CONTENT_TYPE, RAW_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|error| {
                tracing::error!(%error, "Couldn't send data to HTTP relay");
                error
            })?;

        ensure_success(response).await?;

        Ok(Delivery::Delivered)
    }
}
