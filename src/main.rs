use cloudevents_forwarder::{
    server, Forwarder, Managed, Mode, Noop, Raw, Result, Settings, Target,
};
use std::{
    net::{Ipv4Addr, SocketAddr},
    process::ExitCode,
};
use tracing::Instrument;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(ref error) => {
            tracing::error!(%error, "Couldn't load settings");
            return ExitCode::FAILURE;
        }
    };

    let span = tracing::info_span!("forwarder", service = %settings.name);

    match run(settings).instrument(span.clone()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(ref error) => {
            span.in_scope(|| tracing::error!(%error, "Forwarder stopped"));
            ExitCode::FAILURE
        }
    }
}

async fn run(settings: Settings) -> Result<()> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, settings.port));
    let mode = settings.mode();

    tracing::info!(
        port = settings.port,
        target = %settings.target,
        ?mode,
        "Starting forwarder"
    );

    if let Some(delay) = settings.delay {
        tracing::info!(?delay, "Pausing after each forwarded event");
    }

    match (&settings.target, mode) {
        (Target::Print, _) => {
            server::serve(Forwarder::new(&settings, Noop::new()), mode, addr).await
        }
        (Target::Url(url), Mode::Managed) => {
            let relay = Managed::new(url.clone())?;
            server::serve(Forwarder::new(&settings, relay), mode, addr).await
        }
        (Target::Url(url), Mode::Raw) => {
            let relay = Raw::new(url.clone())?;
            server::serve(Forwarder::new(&settings, relay), mode, addr).await
        }
    }
}
