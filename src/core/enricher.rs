//! Record enricher: per-tick queue drain, sensor mapping, unit conversion

use super::protocol;
use super::record::Record;
use super::units::{self, UnitConverter};
use crossbeam_channel::Receiver;
use std::collections::HashMap;
use std::sync::Arc;

/// Observation name to expected transducer type code.
///
/// Configured once at startup and read-only afterward. An empty map means
/// no reading is ever applied.
pub type SensorMap = HashMap<String, String>;

/// Drains the hand-off queue on each polling tick and writes matching,
/// unit-converted readings into the caller's record.
pub struct RecordEnricher {
    rx: Receiver<String>,
    sensor_map: SensorMap,
    max_packets: usize,
    converter: Arc<dyn UnitConverter>,
}

impl RecordEnricher {
    /// Builds an enricher over the consumer half of the hand-off queue.
    pub fn new(
        rx: Receiver<String>,
        sensor_map: SensorMap,
        max_packets: usize,
        converter: Arc<dyn UnitConverter>,
    ) -> Self {
        Self {
            rx,
            sensor_map,
            max_packets,
            converter,
        }
    }

    /// One polling tick. Never blocks and never fails; every malformed
    /// reading is absorbed individually.
    pub fn enrich(&self, record: &mut Record) {
        loop {
            // Only the most recent reading per transducer matters for a
            // live record; stale backlog is discarded oldest-first. The
            // bound is re-checked before every pop so a producer racing
            // the drain cannot push a tick past it.
            while self.rx.len() > self.max_packets {
                let _ = self.rx.try_recv();
            }

            let Ok(sentence) = self.rx.try_recv() else {
                return;
            };
            self.apply_sentence(&sentence, record);
        }
    }

    fn apply_sentence(&self, sentence: &str, record: &mut Record) {
        for reading in protocol::decode_readings(sentence) {
            if reading.transducer_type.is_empty()
                || reading.value.is_empty()
                || reading.unit.is_empty()
            {
                continue;
            }

            let Ok(value) = reading.value.parse::<f64>() else {
                tracing::debug!("unparsable value {:?} from {:?}", reading.value, reading.name);
                continue;
            };

            let Some(vt) = units::normalize(value, &reading.unit) else {
                tracing::debug!("unsupported unit code {:?} from {:?}", reading.unit, reading.name);
                continue;
            };

            for (obs_name, expected_type) in &self.sensor_map {
                if *expected_type == reading.transducer_type {
                    if let Some(converted) = self.converter.convert(vt, record.unit_system()) {
                        record.set(obs_name, converted);
                    }
                }
            }
        }
    }
}
