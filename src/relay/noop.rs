use super::{Delivery, Relay};
use crate::{Event, Result};

/// A [`Relay`] that won't do anything with events
#[derive(Debug, Default, Clone, Copy)]
pub struct Noop;

impl Noop {
    /// Creates an instance of [`Noop`] [`Relay`]
    pub fn new() -> Self {
        Self
    }
}

impl Relay for Noop {
    async fn transport(&self, _event: &Event) -> Result<Delivery> {
        Ok(Delivery::Discarded)
    }
}
