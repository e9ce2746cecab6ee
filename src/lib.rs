//! # xdrlink
//!
//! Decoder and bounded-buffering pipeline for NMEA 0183 "XDR" (transducer
//! measurement) sentences arriving over a serial link, built to be
//! embedded in a periodic-polling host that must never block on I/O.
//!
//! Two components with a strict one-way data flow:
//!
//! - A sentence reader on its own thread blocks on the serial line,
//!   validates framing and checksum, filters for XDR, and pushes clean
//!   sentences into an unbounded hand-off queue.
//! - A record enricher, invoked on each of the host's polling ticks,
//!   drains the queue (bounded to a maximum backlog, oldest discarded
//!   first), maps readings through a configured sensor map, and writes
//!   unit-converted values into the caller's record.
//!
//! ## Example
//!
//! ```rust,no_run
//! use xdrlink::{Lifecycle, Record, UnitSystem, XdrConfig, XdrService};
//!
//! fn main() -> Result<(), xdrlink::ServiceError> {
//!     let mut config = XdrConfig::default();
//!     config.sensor_map.insert("outTemp".to_string(), "C".to_string());
//!
//!     let mut service = XdrService::new(config);
//!     service.on_startup()?;
//!
//!     loop {
//!         std::thread::sleep(std::time::Duration::from_secs(2));
//!         let mut record = Record::new(UnitSystem::Metric);
//!         service.on_new_data(&mut record);
//!         if let Some(temp) = record.get("outTemp") {
//!             println!("outTemp = {temp:.1}");
//!         }
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod core;

// Re-exports for convenience
pub use crate::config::{ConfigError, XdrConfig};
pub use crate::core::enricher::{RecordEnricher, SensorMap};
pub use crate::core::protocol::{SentenceError, TransducerReading};
pub use crate::core::reader::{RunFlag, SentenceReader};
pub use crate::core::record::Record;
pub use crate::core::service::{Lifecycle, ServiceError, XdrService};
pub use crate::core::transport::{LineSource, SerialConfig, SerialLineSource, TransportError};
pub use crate::core::units::{
    StdConverter, Unit, UnitConverter, UnitGroup, UnitSystem, ValueTuple,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
