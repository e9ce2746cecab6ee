//! Core pipeline modules
//!
//! Data flows one direction: raw bytes from the transport, through XDR
//! validation in the reader thread, across the hand-off queue, into the
//! enricher on the host's polling thread.

pub mod enricher;
pub mod protocol;
pub mod reader;
pub mod record;
pub mod service;
pub mod transport;
pub mod units;
