use crate::{Delivery, Event, Relay, Result, Settings};
use std::time::Duration;

/// Passes events on to a [`Relay`]
#[derive(Debug)]
pub struct Forwarder<R> {
    name: String,
    relay: R,
    print_event: bool,
    delay: Option<Duration>,
}

impl<R> Forwarder<R>
where
    R: Relay,
{
    /// Creates a [`Forwarder`] configured by `settings`
    pub fn new(settings: &Settings, relay: R) -> Self {
        Self {
            name: settings.name.clone(),
            relay,
            print_event: settings.print_event,
            delay: settings.delay,
        }
    }

    /// Service name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Forwards a single event
    ///
    /// Unless the event is discarded, the configured delay is awaited once the
    /// attempt completes, whether it succeeded or not.
    pub async fn forward(&self, event: Event) -> Result<Delivery> {
        if self.print_event {
            tracing::info!(%event, "event");
        }

        let result = self.relay.transport(&event).await;

        if let Ok(Delivery::Discarded) = result {
            return result;
        }

        let delay = self.delay.unwrap_or_default();

        match result {
            Ok(ref delivery) => tracing::info!(
                source = event.source(),
                id = event.id(),
                ?delivery,
                ?delay,
                "Forwarded event"
            ),
            Err(ref error) => tracing::warn!(
                source = event.source(),
                id = event.id(),
                %error,
                ?delay,
                "Couldn't forward event"
            ),
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Target, Error, Noop};
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Instant,
    };

    #[derive(Debug, Default)]
    struct Counting {
        calls: AtomicUsize,
        fail: bool,
    }

    impl Relay for Counting {
        async fn transport(&self, _event: &Event) -> Result<Delivery> {
            let _ = self.calls.fetch_add(1, Ordering::SeqCst);

            if self.fail {
                Err(Error::Rejected { status_code: 502 })
            } else {
                Ok(Delivery::Delivered)
            }
        }
    }

    fn settings(delay_millis: u64) -> Settings {
        Settings {
            name: "test".into(),
            delay: Some(Duration::from_millis(delay_millis)),
            target: Target::Print,
            port: 8080,
            print_event: true,
            skip_sdk: false,
        }
    }

    #[tokio::test]
    async fn waits_after_delivery() {
        let forwarder = Forwarder::new(&settings(100), Counting::default());

        let started = Instant::now();
        let delivery = forwarder.forward(Event::new()).await.unwrap();

        assert_eq!(delivery, Delivery::Delivered);
        assert!(started.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn waits_after_failed_delivery() {
        let relay = Counting {
            fail: true,
            ..Counting::default()
        };
        let forwarder = Forwarder::new(&settings(50), relay);

        let started = Instant::now();
        let result = forwarder.forward(Event::new()).await;

        assert!(matches!(result, Err(Error::Rejected { status_code: 502 })));
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert_eq!(forwarder.relay.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn discarded_events_skip_the_delay() {
        let forwarder = Forwarder::new(&settings(5_000), Noop::new());

        let started = Instant::now();
        let delivery = forwarder.forward(Event::new()).await.unwrap();

        assert_eq!(delivery, Delivery::Discarded);
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(forwarder.name(), "test");
    }
}
