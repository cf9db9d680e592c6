//! PCAP/PCAPNG file source.
//!
//! The file format is sniffed from its magic bytes; legacy PCAP and PCAPNG
//! blocks are both turned into `PacketEvent`s with per-interface link types.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::PcapFileSource;
