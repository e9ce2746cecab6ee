//! Sentence reader: blocking serial loop feeding the hand-off queue

use super::protocol;
use super::transport::{LineSource, TransportError};
use crossbeam_channel::Sender;
use parking_lot::Mutex;
use std::sync::Arc;

/// Shared stop request for the reader loop.
///
/// Written once by the owning service at shutdown, read by the reader on
/// every iteration.
pub type RunFlag = Arc<Mutex<bool>>;

/// Continuously reads, validates, and enqueues XDR sentences.
///
/// Owns the producer half of the hand-off queue. The queue is unbounded
/// so the reader never blocks on a slow consumer; the enricher bounds the
/// backlog on its side.
pub struct SentenceReader {
    source: Box<dyn LineSource>,
    tx: Sender<String>,
    run_flag: RunFlag,
}

impl SentenceReader {
    /// Builds a reader over an already-opened line source.
    pub fn new(source: Box<dyn LineSource>, tx: Sender<String>, run_flag: RunFlag) -> Self {
        Self {
            source,
            tx,
            run_flag,
        }
    }

    /// Runs until the flag is cleared or the device faults.
    ///
    /// Malformed lines are expected noise and dropped with a debug log;
    /// read timeouts loop back to the flag check. Only transport faults
    /// propagate, ending the thread. The source is released by drop on
    /// every exit path.
    pub fn run(mut self) -> Result<(), TransportError> {
        loop {
            if !*self.run_flag.lock() {
                return Ok(());
            }

            let Some(line) = self.source.read_line()? else {
                continue;
            };

            match protocol::validate_xdr(&line) {
                Ok(sentence) => {
                    // A closed receiver means the service is gone.
                    if self.tx.send(sentence.to_string()).is_err() {
                        return Ok(());
                    }
                }
                Err(err) => tracing::debug!("dropping line: {err}"),
            }
        }
    }
}
