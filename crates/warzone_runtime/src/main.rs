//! Warzone host
//!
//! Loads the plugin configuration and event catalog, wires the zone engine
//! to in-memory world collaborators and replays a scripted scenario through
//! it at a fixed tick.
//!
//! Run with: cargo run -p warzone_runtime -- --scenario demos/crate_raid.toml
//!       or: cargo run --bin warzone -- --config demos/warzone.toml --scenario demos/crate_raid.toml

mod error;
mod observer;
mod scenario;

use error::{RuntimeError, RuntimeResult};
use observer::{LoggingObserver, Tally};
use scenario::Scenario;

use warzone_catalog::{EventCatalog, PluginConfig, UserEventStore};
use warzone_zones::prelude::*;

const DEFAULT_CONFIG: &str = "warzone.toml";

const USAGE: &str = "\
usage: warzone [--config <path>] --scenario <path>

  --config <path>     plugin configuration (default: warzone.toml)
  --scenario <path>   scripted world timeline to replay
  --help              print this message";

#[derive(Debug, Default)]
struct Args {
    config: Option<String>,
    scenario: Option<String>,
    help: bool,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> RuntimeResult<Self> {
        let mut parsed = Args::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => parsed.config = Some(value_of(&arg, args.next())?),
                "--scenario" | "-s" => parsed.scenario = Some(value_of(&arg, args.next())?),
                "--help" | "-h" => parsed.help = true,
                other => return Err(RuntimeError::Usage(format!("unknown argument '{}'", other))),
            }
        }
        Ok(parsed)
    }
}

fn value_of(flag: &str, value: Option<String>) -> RuntimeResult<String> {
    value.ok_or_else(|| RuntimeError::Usage(format!("{} needs a value", flag)))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("PANIC CAUGHT: {}", panic_info);
    }));

    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };
    if args.help {
        println!("{}", USAGE);
        return;
    }

    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> RuntimeResult<()> {
    let scenario_path = args
        .scenario
        .as_deref()
        .ok_or_else(|| RuntimeError::Usage("--scenario is required".to_string()))?;

    let config = PluginConfig::load_or_default(args.config.as_deref().unwrap_or(DEFAULT_CONFIG))?;
    let catalog = EventCatalog::load_or_default(&config.general.catalog_path)?;
    let store = UserEventStore::load_or_default(&config.general.store_path)?;
    log::info!(
        "{} event definitions, {} autostart user events",
        catalog.names().count(),
        store.autostart_events().count()
    );

    let scenario = Scenario::load(scenario_path)?;
    log::info!("Replaying {} ({} steps, tick {}s)", scenario_path, scenario.steps.len(), scenario.tick);

    let ctx = ZoneContext::new(catalog, store).with_paths(&config.general.catalog_path, &config.general.store_path);
    let zones = MemoryZoneProvider::new();
    let world = MemoryWorld::new(zones.clone());
    scenario.seed(&world);

    let tally = Tally::default();
    let services = Services::new(zones.clone(), world.clone()).with_observer(LoggingObserver::new(tally.clone()));
    let mut manager = ZoneManager::new(ctx, services, config);

    manager.begin_startup();
    scenario.run(&mut manager, &world);

    let still_active = manager.active_zone_count();
    let delayed = manager.delays().len();
    manager.shutdown();

    println!();
    println!("Scenario finished at t={:.1}s", manager.now());
    println!("  zones active at end  {}", still_active);
    println!("  actors in PvP delay  {}", delayed);
    println!("  provider creates     {}", zones.create_calls().len());
    println!("  provider erases      {}", zones.erase_calls().len());
    for line in tally.lines() {
        println!("  {}", line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> RuntimeResult<Args> {
        Args::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_args() {
        let args = parse(&["--config", "a.toml", "-s", "b.toml"]).unwrap();
        assert_eq!(args.config.as_deref(), Some("a.toml"));
        assert_eq!(args.scenario.as_deref(), Some("b.toml"));
        assert!(!args.help);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(matches!(parse(&["--scenario"]), Err(RuntimeError::Usage(_))));
        assert!(matches!(parse(&["--verbose"]), Err(RuntimeError::Usage(_))));
    }
}
