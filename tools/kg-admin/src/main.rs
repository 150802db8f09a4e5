//! KG-Admin: Keygate admin CLI

use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::debug;

use kg_01_bridge::{ConnectivityState, RetryCoordinator};
use kg_02_key_admin::{demo_keys, KeyAdminService, KeyCollection, KeySource, NewKey, UpdateKey};
use kg_admin::{ui, Args, Command};
use kg_telemetry::{init_telemetry, TelemetryConfig};
use shared_bus::{EventFilter, InMemoryEventBus, Subscription};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_telemetry(&TelemetryConfig::for_tool("kg-admin")).context("initializing logging")?;

    if args.demo {
        return run_demo(&args.command);
    }

    let config = args.resolve_config().context("loading configuration")?;

    let bus = Arc::new(InMemoryEventBus::new());
    let mut events = bus.subscribe(EventFilter::all());
    let connectivity = Arc::new(ConnectivityState::with_publisher(bus.clone()));
    let api = Arc::new(kg_01_bridge::connect(&config, connectivity).context("connecting to the API")?);
    let service = KeyAdminService::new(api.clone(), bus.clone());

    let result = run(&args.command, &api, &service, &mut events).await;
    print_events(&mut events);
    result
}

async fn run(
    command: &Command,
    api: &RetryCoordinator,
    service: &KeyAdminService,
    events: &mut Subscription,
) -> anyhow::Result<()> {
    debug!(command = ?command, "Running command");

    match command {
        Command::Test => {
            let outcome = api.probe().await;
            print_events(events);
            match outcome {
                Ok(_) => println!("API reachable"),
                Err(e) if e.is_connectivity() => bail!("API unreachable: {}", e),
                // The server answered, so the deployment is up
                Err(e) => println!("API reachable, but rejected the probe: {}", e),
            }
        }
        Command::List { search } => {
            service.load_keys().await;
            print_events(events);
            let keys = service.search(search.as_deref().unwrap_or_default());
            print!("{}", ui::render_keys(&keys, service.today()));
        }
        Command::Stats => {
            service.load_keys().await;
            print_events(events);
            print!("{}", ui::render_stats(&service.stats()));
        }
        Command::Ban { key } => service.ban_key(key).await?,
        Command::Delete { key } => service.delete_key(key).await?,
        Command::Add { key, days, notes } => {
            require_remote(service.load_keys().await)?;
            print_events(events);
            let record = service.add_key(NewKey::new(key.as_str(), *days, notes.as_str())).await?;
            println!("{} expires {}", record.key, record.expire_date);
        }
        Command::Update { key, days, notes } => {
            require_remote(service.load_keys().await)?;
            print_events(events);
            let record = service
                .update_key(UpdateKey::new(key.as_str(), *days, notes.as_str()))
                .await?;
            println!("{} expires {}", record.key, record.expire_date);
        }
    }
    Ok(())
}

/// Add and update validate against the loaded collection; demo records would
/// make that check meaningless.
fn require_remote(source: KeySource) -> anyhow::Result<()> {
    if source != KeySource::Remote {
        bail!("key sheet unavailable, refusing to modify keys against demo data");
    }
    Ok(())
}

fn run_demo(command: &Command) -> anyhow::Result<()> {
    if command.is_mutation() || *command == Command::Test {
        bail!("'{:?}' needs the API and is not available with --demo", command);
    }

    let mut keys = KeyCollection::new();
    keys.replace(demo_keys(), KeySource::Demo);
    let today = chrono::Utc::now().date_naive();

    match command {
        Command::List { search } => {
            let matches = keys.search(search.as_deref().unwrap_or_default());
            print!("{}", ui::render_keys(&matches, today));
        }
        Command::Stats => print!("{}", ui::render_stats(&keys.stats(today))),
        _ => {}
    }
    Ok(())
}

fn print_events(events: &mut Subscription) {
    for event in events.drain() {
        eprintln!("{}", ui::render_event(&event));
    }
}
