//! Settings read from the environment

use crate::{Error, Result};
use figment::{providers::Env, util::bool_from_str_or_int, Figment};
use reqwest::Url;
use serde::Deserialize;
use std::{str::FromStr, time::Duration};

/// Target value that discards events instead of forwarding them
pub const PRINT_TARGET: &str = "print";

const DEFAULT_NAME: &str = "CloudEventsForwarder";
const DEFAULT_PORT: u16 = 8080;

const NAME: &str = "NAME";
const SLEEP_SECONDS: &str = "CLOUDEVENTS_FORWARDER_SLEEP_SECONDS";
const TARGET: &str = "CLOUDEVENTS_FORWARDER_TARGET";
const PORT: &str = "PORT";
const PRINT_EVENT: &str = "PRINT_EVENT";
const SKIP_SDK: &str = "SKIP_SDK";

/// Where events end up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Events are logged and dropped
    Print,

    /// Events are POSTed to this URL
    Url(Url),
}

impl FromStr for Target {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        if value == PRINT_TARGET {
            return Ok(Self::Print);
        }

        Url::parse(value)
            .map(Self::Url)
            .map_err(|error| Error::Config(format!("{}={:?}: {}", TARGET, value, error)))
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Print => f.write_str(PRINT_TARGET),
            Self::Url(url) => write!(f, "{}", url),
        }
    }
}

/// How events are delivered to a [`Target::Url`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Structured CloudEvents encoding with retries
    Managed,

    /// Single plain HTTP POST
    Raw,
}

/// Forwarder settings, read once from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Service name used in logs and the status page
    pub name: String,

    /// Pause after every delivery attempt
    pub delay: Option<Duration>,

    /// Destination of forwarded events
    pub target: Target,

    /// Port to listen on
    pub port: u16,

    /// Log every received event
    pub print_event: bool,

    /// Use [`Mode::Raw`] instead of [`Mode::Managed`]
    pub skip_sdk: bool,
}

/// Environment variables as figment hands them over, keys lowercased
#[derive(Debug, Deserialize)]
struct Vars {
    #[serde(default)]
    name: Option<String>,

    #[serde(default, rename = "cloudevents_forwarder_sleep_seconds")]
    sleep_seconds: f64,

    #[serde(default, rename = "cloudevents_forwarder_target")]
    target: Option<String>,

    #[serde(default = "default_port")]
    port: u16,

    #[serde(default, deserialize_with = "bool_from_str_or_int")]
    print_event: bool,

    #[serde(default, deserialize_with = "bool_from_str_or_int")]
    skip_sdk: bool,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Settings {
    /// Reads settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_figment(
            Figment::new().merge(Env::raw().only(&[
                NAME,
                SLEEP_SECONDS,
                TARGET,
                PORT,
                PRINT_EVENT,
                SKIP_SDK,
            ])),
        )
    }

    /// Reads settings out of `figment`
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let vars: Vars = figment
            .extract()
            .map_err(|error| Error::Config(error.to_string()))?;

        let target: Target = vars
            .target
            .filter(|target| !target.is_empty())
            .ok_or_else(|| Error::Config(format!("required key {} missing value", TARGET)))?
            .parse()?;

        let delay = Duration::try_from_secs_f64(vars.sleep_seconds).map_err(|error| {
            Error::Config(format!(
                "{}={}: {}",
                SLEEP_SECONDS, vars.sleep_seconds, error
            ))
        })?;

        if vars.port == 0 {
            return Err(Error::Config(format!("{} must be positive", PORT)));
        }

        Ok(Self {
            name: vars
                .name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_NAME.to_owned()),
            delay: Some(delay).filter(|delay| !delay.is_zero()),
            // Discarded events are only visible through the log
            print_event: vars.print_event || target == Target::Print,
            target,
            port: vars.port,
            skip_sdk: vars.skip_sdk,
        })
    }

    /// Delivery mode picked by [`Settings::skip_sdk`]
    pub fn mode(&self) -> Mode {
        if self.skip_sdk {
            Mode::Raw
        } else {
            Mode::Managed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn applies_defaults() {
        Jail::expect_with(|jail| {
            jail.set_env(TARGET, "http://sink:8080/");

            let settings = Settings::from_env().unwrap();

            assert_eq!(settings.name, "CloudEventsForwarder");
            assert_eq!(settings.port, 8080);
            assert_eq!(settings.delay, None);
            assert!(!settings.print_event);
            assert_eq!(settings.mode(), Mode::Managed);
            assert_eq!(
                settings.target,
                Target::Url("http://sink:8080/".parse().unwrap())
            );

            Ok(())
        });
    }

    #[test]
    fn target_is_required() {
        Jail::expect_with(|jail| {
            assert!(matches!(Settings::from_env(), Err(Error::Config(_))));

            jail.set_env(TARGET, "");
            assert!(matches!(Settings::from_env(), Err(Error::Config(_))));

            Ok(())
        });
    }

    #[test]
    fn rejects_relative_target() {
        Jail::expect_with(|jail| {
            jail.set_env(TARGET, "sink/events");

            assert!(matches!(Settings::from_env(), Err(Error::Config(_))));

            Ok(())
        });
    }

    #[test]
    fn print_target_turns_on_event_printing() {
        Jail::expect_with(|jail| {
            jail.set_env(TARGET, "print");

            let settings = Settings::from_env().unwrap();

            assert_eq!(settings.target, Target::Print);
            assert!(settings.print_event);

            Ok(())
        });
    }

    #[test]
    fn reads_every_setting() {
        Jail::expect_with(|jail| {
            jail.set_env(NAME, "relay-a");
            jail.set_env(SLEEP_SECONDS, "0.25");
            jail.set_env(TARGET, "http://localhost:9000");
            jail.set_env(PORT, "9090");
            jail.set_env(PRINT_EVENT, "true");
            jail.set_env(SKIP_SDK, "1");

            let settings = Settings::from_env().unwrap();

            assert_eq!(settings.name, "relay-a");
            assert_eq!(settings.delay, Some(Duration::from_millis(250)));
            assert_eq!(settings.port, 9090);
            assert!(settings.print_event);
            assert_eq!(settings.mode(), Mode::Raw);

            Ok(())
        });
    }

    #[test]
    fn rejects_bad_values() {
        for (key, value) in [
            (SLEEP_SECONDS, "-1"),
            (SLEEP_SECONDS, "soon"),
            (PORT, "0"),
            (PORT, "70000"),
            (PRINT_EVENT, "maybe"),
            (SKIP_SDK, "2"),
        ] {
            Jail::expect_with(|jail| {
                jail.set_env(TARGET, "print");
                jail.set_env(key, value);

                assert!(
                    matches!(Settings::from_env(), Err(Error::Config(_))),
                    "{}={} should be rejected",
                    key,
                    value
                );

                Ok(())
            });
        }
    }

    #[test]
    fn delay_too_long_for_a_duration_is_a_config_error() {
        Jail::expect_with(|jail| {
            jail.set_env(TARGET, "print");
            jail.set_env(SLEEP_SECONDS, "1e300");

            assert!(matches!(Settings::from_env(), Err(Error::Config(_))));

            Ok(())
        });
    }
}
