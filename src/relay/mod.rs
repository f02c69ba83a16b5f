//! [`Relay`] is an abstraction on where events will be sent to

mod managed;
mod noop;
mod raw;

pub use self::managed::*;
pub use self::noop::*;
pub use self::raw::*;

use crate::{Error, Event, Result};
use std::future::Future;

/// What a [`Relay`] did with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Destination acknowledged the event
    Delivered,

    /// Event was dropped on purpose
    Discarded,
}

/// Trait for event transportation
///
/// A relay is built once at startup and shared by every request handler.
pub trait Relay: Send + Sync + 'static {
    /// Hands the event over to the destination, such as:
    /// - an HTTP endpoint speaking structured CloudEvents
    /// - an HTTP endpoint taking plain JSON
    /// - nowhere at all
    fn transport(&self, event: &Event) -> impl Future<Output = Result<Delivery>> + Send;
}

async fn ensure_success(response: reqwest::Response) -> Result<()> {
    let status = response.status();

    if status.is_success() {
        return Ok(());
    }

    let status_code = status.as_u16();
    let response_body = response.text().await;

    match response_body {
        Ok(body) => {
            tracing::error!(%status_code, %body, "Couldn't complete HTTP request successfully");
        }
        Err(ref error) => {
            tracing::error!(%status_code, %error, "Couldn't complete HTTP request successfully");
        }
    }

    Err(Error::Rejected { status_code })
}
