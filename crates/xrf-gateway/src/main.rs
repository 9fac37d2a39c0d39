//! XRF gateway runner.
//!
//! Opens the dongle, starts the link pump and protocol engine, and runs
//! periodic identification sweeps until interrupted. Discovered fixtures are
//! logged as JSON lines; anything that wants richer access (an HTTP API, for
//! example) builds on the same `ProtocolEngine` handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use xrf_driver::{
    open_dongle, DeviceEntry, DeviceRegistry, DriverError, EngineConfig, LinkPump, ProtocolEngine,
    PumpConfig,
};
use xrf_protocol::XRF_UNIVERSAL_GROUP;

#[derive(Parser, Debug)]
#[command(name = "xrf-gateway", about = "Gateway driver for the XRF lighting mesh")]
struct Args {
    /// Serial port of the dongle (auto-detected by USB VID:PID when omitted).
    #[arg(long)]
    port: Option<String>,

    /// Radio channel to tune at startup.
    #[arg(long, default_value_t = 1)]
    channel: u8,

    /// Hop budget stamped on transmitted packets.
    #[arg(long, default_value_t = 0)]
    hops: u8,

    /// Group to sweep during discovery (255 = every fixture on the channel).
    #[arg(long, default_value_t = XRF_UNIVERSAL_GROUP)]
    group: u8,

    /// Seconds between identification sweeps (0 = sweep once at startup).
    #[arg(long, default_value_t = 60)]
    discover_every: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), DriverError> {
    // The only fatal error in the driver: no dongle, no gateway.
    let link = open_dongle(args.port.as_deref())?;

    let registry = Arc::new(DeviceRegistry::new());
    let (pump_handle, _pump) = LinkPump::spawn(link, PumpConfig::default());
    let (engine, _dispatch) = ProtocolEngine::spawn(
        pump_handle,
        registry,
        EngineConfig {
            initial_channel: args.channel,
            default_hops: args.hops,
            ..EngineConfig::default()
        },
    );

    engine.request_dongle_info();
    engine.enable_rx(true);
    engine.set_channel(args.channel);

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        if let Err(e) = ctrlc::set_handler(move || running.store(false, Ordering::SeqCst)) {
            warn!("could not install Ctrl-C handler: {}", e);
        }
    }

    info!(
        "sweeping group {} on channel {}",
        args.group, args.channel
    );
    while running.load(Ordering::SeqCst) {
        let devices = engine.identify_all(args.group);
        log_devices(&devices);

        if args.discover_every == 0 {
            // Single sweep; stay alive to keep folding in reports.
            while running.load(Ordering::SeqCst) {
                thread::sleep(Duration::from_millis(500));
            }
            break;
        }

        let mut remaining = Duration::from_secs(args.discover_every);
        while running.load(Ordering::SeqCst) && !remaining.is_zero() {
            let slice = remaining.min(Duration::from_millis(500));
            thread::sleep(slice);
            remaining -= slice;
        }
    }

    info!("shutting down");
    Ok(())
}

fn log_devices(devices: &[DeviceEntry]) {
    info!("known fixtures: {}", devices.len());
    for entry in devices {
        if let Ok(line) = serde_json::to_string(entry) {
            info!("{}", line);
        }
    }
}
