//! Capture inputs feeding the dissection layer.
//!
//! Sources only move raw frames out of files; decoding happens elsewhere.

mod pcap;

pub use pcap::PcapFileSource;

use pcap_parser::Linktype;
use thiserror::Error;

/// One captured frame with its link type and capture time (seconds).
#[derive(Debug, Clone)]
pub struct PacketEvent {
    pub ts: Option<f64>,
    pub linktype: Linktype,
    pub data: Vec<u8>,
}

pub trait PacketSource {
    fn next_packet(&mut self) -> Result<Option<PacketEvent>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("capture parse error: {0}")]
    Pcap(String),
}

impl From<pcap::error::PcapSourceError> for SourceError {
    fn from(value: pcap::error::PcapSourceError) -> Self {
        match value {
            pcap::error::PcapSourceError::Io(err) => SourceError::Io(err),
            pcap::error::PcapSourceError::Pcap { context, message } => {
                SourceError::Pcap(format!("{context}: {message}"))
            }
        }
    }
}

/// In-memory source, mostly useful to feed hand-built frames to the analysis.
///
/// # Examples
/// ```
/// use pcap_parser::Linktype;
/// use wiredecode_core::{PacketEvent, PacketSource, VecSource};
///
/// let mut source = VecSource::new(vec![PacketEvent {
///     ts: None,
///     linktype: Linktype::RAW,
///     data: vec![0x45],
/// }]);
/// assert!(source.next_packet()?.is_some());
/// assert!(source.next_packet()?.is_none());
/// # Ok::<(), wiredecode_core::SourceError>(())
/// ```
#[derive(Debug, Default)]
pub struct VecSource {
    events: std::collections::VecDeque<PacketEvent>,
}

impl VecSource {
    pub fn new(events: Vec<PacketEvent>) -> Self {
        Self {
            events: events.into(),
        }
    }
}

impl PacketSource for VecSource {
    fn next_packet(&mut self) -> Result<Option<PacketEvent>, SourceError> {
        Ok(self.events.pop_front())
    }
}
