//! Minimal polling host for the XDR pipeline.
//!
//! Stands in for the weather engine the service is normally embedded in:
//! starts the reader thread, polls the enricher on a fixed cadence, and
//! shuts down cleanly on Ctrl-C.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use xdrlink::{Lifecycle, Record, UnitSystem, XdrConfig, XdrService};

const POLL_INTERVAL: Duration = Duration::from_secs(2);

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => XdrConfig::load(&path)?,
        None => XdrConfig::default(),
    };

    tracing::info!(
        "starting {} v{} on {} @ {} baud",
        xdrlink::NAME,
        xdrlink::VERSION,
        config.serial.port,
        config.serial.baud_rate
    );

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || running.store(false, Ordering::SeqCst))?;
    }

    let mut service = XdrService::new(config);
    service.on_startup()?;

    while running.load(Ordering::SeqCst) {
        std::thread::sleep(POLL_INTERVAL);

        let mut record = Record::new(UnitSystem::Metric);
        service.on_new_data(&mut record);
        for (name, value) in record.iter() {
            tracing::info!("{name} = {value:.2}");
        }
    }

    service.on_shutdown();
    Ok(())
}
