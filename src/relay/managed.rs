use super::{ensure_success, Delivery, Relay};
use crate::{
    normalize::STRUCTURED_CONTENT_TYPE,
    retry::{is_retryable, RetryPolicy},
    CloudEvent, Error, Event, Result,
};
use bytes::Bytes;
use reqwest::{header, Client, Url};
use tokio_retry::RetryIf;

/// A [`Relay`] that sends structured CloudEvents, retrying with exponential backoff
#[derive(Debug, Clone)]
pub struct Managed {
    client: Client,
    url: Url,
    policy: RetryPolicy,
}

impl Managed {
    /// Creates an instance of [`Managed`] [`Relay`] with [`RetryPolicy::EXPONENTIAL`]
    pub fn new(url: Url) -> Result<Self> {
        Self::with_policy(url, RetryPolicy::EXPONENTIAL)
    }

    /// Creates an instance of [`Managed`] [`Relay`] retrying by `policy`
    pub fn with_policy(url: Url, policy: RetryPolicy) -> Result<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            url,
            policy,
        })
    }

    async fn attempt(&self, body: Bytes) -> Result<()> {
        let response = self
            .client
            .post(self.url.clone())
            .header(header::CONTENT_TYPE, STRUCTURED_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        ensure_success(response).await
    }
}

impl Relay for Managed {
    async fn transport(&self, event: &Event) -> Result<Delivery> {
        let cloud_event = CloudEvent::try_from(event.clone())?;
        let body = Bytes::from(serde_json::to_vec(&cloud_event)?);

        let mut attempts = 0;

        let result = RetryIf::start(
            self.policy.strategy(),
            || {
                attempts += 1;
                self.attempt(body.clone())
            },
            |error: &Error| {
                let retryable = is_retryable(error);
                if retryable {
                    tracing::warn!(%error, "Couldn't deliver event");
                }
                retryable
            },
        )
        .await;

        match result {
            Ok(()) => Ok(Delivery::Delivered),
            Err(error) if is_retryable(&error) => Err(Error::RetriesExhausted {
                attempts,
                last: Box::new(error),
            }),
            Err(error) => Err(error),
        }
    }
}
