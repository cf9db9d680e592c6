//! Wire header decoding for Ethernet, IPv4, TCP and UDP.
//!
//! The decoders in [`protocols`] are pure functions from a borrowed byte
//! buffer to a typed header record or an error value. They share one field
//! codec (big-endian assembly, shift-and-mask bit fields) and never read past
//! the bytes they were handed, whatever the input claims about itself.
//!
//! On top of the decoders sit two optional layers:
//! - `analysis`: chaining decoders over whole frames (Ethernet → IPv4 →
//!   TCP/UDP) and turning a capture into a deterministic [`Report`];
//! - `source`: PCAP/PCAPNG capture files as packet sources.
//!
//! The TCP decoder is the only one with real decoding logic: it walks the
//! options region kind by kind, validating every declared length before
//! reading, and reports malformed options as `TcpError::MalformedOption`.
//!
//! # Examples
//! ```
//! use wiredecode_core::protocols::tcp::parse_tcp_header;
//!
//! let mut segment = vec![0u8; 20];
//! segment[12] = 8 << 4;
//! segment.extend_from_slice(&[2, 4, 0x05, 0xb4, 1, 1, 0, 0, 0, 0, 0, 0]);
//!
//! let header = parse_tcp_header(&segment, true)?;
//! let options = header.parsed_options.expect("options walked");
//! assert_eq!(options.mss, Some(1460));
//! assert_eq!(options.nop_count, 2);
//! # Ok::<(), wiredecode_core::protocols::tcp::TcpError>(())
//! ```

use serde::{Deserialize, Serialize};

mod analysis;
mod config;
pub mod protocols;
mod source;

pub use analysis::{
    AnalysisError, DecodeError, Dissection, Transport, analyze_capture_file, analyze_source,
    dissect_frame,
};
pub use config::DecodeConfig;
pub use protocols::tcp::TcpOptions;
pub use source::{PacketEvent, PacketSource, PcapFileSource, SourceError, VecSource};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when no capture time is available.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Decoded capture with deterministic ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    /// RFC3339 timestamp of the last frame, or the epoch when unknown.
    pub generated_at: String,
    pub input: InputInfo,
    /// Decoder settings the report was produced with.
    pub decode_config: DecodeConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_summary: Option<CaptureSummary>,
    /// One record per frame, in capture order.
    pub frames: Vec<FrameRecord>,
    /// Decode failures grouped by identifier, sorted by identifier.
    pub errors: Vec<ErrorSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// Input capture metadata embedded in reports.
///
/// # Examples
/// ```
/// use wiredecode_core::InputInfo;
///
/// let input = InputInfo {
///     path: "capture.pcap".to_string(),
///     bytes: 1024,
/// };
/// assert_eq!(input.bytes, 1024);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the analyzer.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Per-layer frame counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSummary {
    pub frames_total: u64,
    pub ethernet_frames: u64,
    pub ipv4_packets: u64,
    pub tcp_segments: u64,
    pub udp_datagrams: u64,
    /// Frames whose link type has no decoder.
    pub unsupported_frames: u64,
    /// Frames where a decoder returned an error.
    pub failed_frames: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
}

/// Layers decoded from one frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Zero-based position in the capture.
    pub index: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Captured length in bytes.
    pub len: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ethernet: Option<EthernetRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<Ipv4Record>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tcp: Option<TcpRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub udp: Option<UdpRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<FrameError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EthernetRecord {
    /// Source MAC, `aa:bb:cc:dd:ee:ff`.
    pub src: String,
    pub dst: String,
    pub ether_type: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ipv4Record {
    pub src: String,
    pub dst: String,
    pub protocol: u8,
    pub ttl: u8,
    pub total_length: u16,
    pub header_len: usize,
    pub options_len: usize,
    pub fragment_offset: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TcpRecord {
    pub src_port: u16,
    pub dst_port: u16,
    pub seq_number: u32,
    pub ack_number: u32,
    /// Set flags, e.g. `SYN,ACK`.
    pub flags: String,
    pub window_size: u16,
    pub header_len: usize,
    pub options_len: usize,
    /// Decoded options; absent when options were captured opaque.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<TcpOptions>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UdpRecord {
    pub src_port: u16,
    pub dst_port: u16,
    pub length: u16,
}

/// Decoder failure attached to a frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameError {
    /// Stable identifier (e.g. `WD-TCP-MALFORMED-OPTION`).
    pub id: String,
    pub message: String,
}

/// Occurrences of one error identifier across a capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorSummary {
    pub id: String,
    pub count: u64,
    /// Indices of the first few frames that hit this error.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<u64>,
}

/// Build a report with base fields filled and empty aggregates.
///
/// # Examples
/// ```
/// use wiredecode_core::{DecodeConfig, InputInfo, make_stub_report};
///
/// let input = InputInfo { path: "capture.pcap".to_string(), bytes: 123 };
/// let report = make_stub_report(input, DecodeConfig::default());
/// assert_eq!(report.report_version, wiredecode_core::REPORT_VERSION);
/// assert!(report.frames.is_empty());
/// ```
pub fn make_stub_report(input: InputInfo, decode_config: DecodeConfig) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "wiredecode".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input,
        decode_config,
        capture_summary: None,
        frames: vec![],
        errors: vec![],
    }
}
