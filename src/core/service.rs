//! Service lifecycle: reader thread startup, per-tick dispatch, bounded
//! shutdown

use super::enricher::RecordEnricher;
use super::reader::{RunFlag, SentenceReader};
use super::record::Record;
use super::transport::{LineSource, SerialLineSource};
use super::units::StdConverter;
use crate::config::XdrConfig;
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// How long shutdown waits for the reader thread to observe the flag.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Service lifecycle errors.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Startup was called while the reader thread is already running.
    #[error("reader thread already running")]
    AlreadyRunning,

    /// The reader thread could not be spawned.
    #[error("failed to spawn reader thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Hooks the host engine drives: once before its polling loop, once per
/// new-data cycle, exactly once at teardown.
pub trait Lifecycle {
    /// Called once before the polling loop begins.
    fn on_startup(&mut self) -> Result<(), ServiceError>;

    /// Called on every polling tick with that cycle's record.
    fn on_new_data(&mut self, record: &mut Record);

    /// Called exactly once at teardown.
    fn on_shutdown(&mut self);
}

/// The XDR pipeline assembled behind the [`Lifecycle`] hooks.
///
/// Owns the hand-off queue, the shared run flag, and the reader thread
/// handle. The enricher side never blocks; the reader side blocks only on
/// its timeout-bounded line read.
pub struct XdrService {
    config: XdrConfig,
    enricher: RecordEnricher,
    tx: crossbeam_channel::Sender<String>,
    run_flag: RunFlag,
    source: Option<Box<dyn LineSource>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl XdrService {
    /// Builds the service from configuration. The serial port itself is
    /// opened on the reader thread at startup.
    pub fn new(config: XdrConfig) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        let enricher = RecordEnricher::new(
            rx,
            config.sensor_map.clone(),
            config.max_packets,
            Arc::new(StdConverter),
        );
        Self {
            config,
            enricher,
            tx,
            run_flag: Arc::new(Mutex::new(true)),
            source: None,
            handle: None,
        }
    }

    /// Same, but reading from a caller-supplied line source instead of
    /// the configured serial port.
    pub fn with_source(config: XdrConfig, source: Box<dyn LineSource>) -> Self {
        let mut service = Self::new(config);
        service.source = Some(source);
        service
    }

    /// Whether the reader thread is currently alive.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn spawn_reader(&mut self) -> Result<(), ServiceError> {
        *self.run_flag.lock() = true;

        let tx = self.tx.clone();
        let run_flag = Arc::clone(&self.run_flag);
        let source = self.source.take();
        let serial = self.config.serial.clone();

        let handle = thread::Builder::new()
            .name("xdr-reader".to_string())
            .spawn(move || {
                let source = match source {
                    Some(source) => source,
                    None => match SerialLineSource::open(&serial) {
                        Ok(source) => Box::new(source) as Box<dyn LineSource>,
                        Err(err) => {
                            tracing::error!("failed to open {}: {err}", serial.port);
                            return;
                        }
                    },
                };
                let reader = SentenceReader::new(source, tx, run_flag);
                if let Err(err) = reader.run() {
                    // No reconnection is attempted; the host notices the
                    // dead thread while the enricher degrades to a no-op.
                    tracing::error!("reader thread terminated: {err}");
                }
            })?;

        self.handle = Some(handle);
        Ok(())
    }
}

impl Lifecycle for XdrService {
    fn on_startup(&mut self) -> Result<(), ServiceError> {
        if self.handle.is_some() {
            return Err(ServiceError::AlreadyRunning);
        }
        tracing::info!("sensor map is {:?}", self.config.sensor_map);
        self.spawn_reader()
    }

    fn on_new_data(&mut self, record: &mut Record) {
        self.enricher.enrich(record);
    }

    fn on_shutdown(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        tracing::info!("shutting down reader thread");
        *self.run_flag.lock() = false;

        // Bounded wait; an unresponsive thread is abandoned, never killed.
        let deadline = Instant::now() + SHUTDOWN_GRACE;
        while !handle.is_finished() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(50));
        }

        if handle.is_finished() {
            let _ = handle.join();
            tracing::debug!("reader thread has been terminated");
        } else {
            tracing::warn!("unable to shut down reader thread within {SHUTDOWN_GRACE:?}");
        }
    }
}
