use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use lineup_core::{
    DiscardVolumeStore, HttpRosterApi, Lineup, LineupCommand, LineupEvent, LineupRuntime,
    PlatformInfo, RosterSource, SimulatedHost, SimulatedPlayer, StaticRosterSource,
    VolumeControl, VolumeStore,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{parse_command, HELP};
use config::{load_settings, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Overrides the configured roster endpoint.
    #[arg(long)]
    endpoint: Option<String>,
    /// Overrides the configured user agent used for volume gating.
    #[arg(long)]
    user_agent: Option<String>,
}

type RosterBackend = (Arc<dyn RosterSource>, Arc<dyn VolumeStore>);

fn roster_backend(endpoint: Option<&str>) -> Result<RosterBackend> {
    let Some(endpoint) = endpoint else {
        info!("no endpoint configured, using demo roster");
        let source: Arc<dyn RosterSource> = Arc::new(StaticRosterSource::demo());
        let store: Arc<dyn VolumeStore> = Arc::new(DiscardVolumeStore);
        return Ok((source, store));
    };
    let api = Arc::new(HttpRosterApi::new(endpoint)?);
    info!(endpoint, "using remote roster");
    let source: Arc<dyn RosterSource> = api.clone();
    let store: Arc<dyn VolumeStore> = api;
    Ok((source, store))
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config);
    if args.endpoint.is_some() {
        settings.endpoint = args.endpoint;
    }
    if args.user_agent.is_some() {
        settings.user_agent = args.user_agent;
    }

    let volume_control = settings
        .user_agent
        .as_deref()
        .map(|agent| VolumeControl::detect(&PlatformInfo::from_user_agent(agent)))
        .unwrap_or_default();
    let (source, store) = roster_backend(settings.endpoint.as_deref())?;

    let lineup =
        Lineup::<SimulatedPlayer>::new(settings.playback_config(), volume_control, store);
    let host = Arc::new(SimulatedHost::ready(&settings.container_id));
    let (runtime, handle) = LineupRuntime::new(lineup, source, host, settings.container_id.clone());

    let mut events = handle.subscribe_events();
    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(LineupEvent::Snapshot(snapshot)) => match serde_json::to_string(&snapshot) {
                    Ok(line) => println!("{line}"),
                    Err(err) => eprintln!("snapshot encoding failed: {err}"),
                },
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
    let runtime_task = tokio::spawn(runtime.run());

    eprintln!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == "help" {
            eprintln!("{HELP}");
            continue;
        }
        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(LineupCommand::Shutdown)) => break,
            Ok(Some(command)) => handle.send(command)?,
            Err(err) => eprintln!("{err}"),
        }
    }

    // The runtime may already be gone.
    let _ = handle.send(LineupCommand::Shutdown);
    drop(handle);
    runtime_task.await?;
    printer.await?;
    Ok(())
}
