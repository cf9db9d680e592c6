//! Ethernet II link-layer decoding.
//!
//! The header is a fixed 14 bytes: destination MAC, source MAC and the
//! EtherType used to pick the next decoder. Frames shorter than that are
//! rejected before any field is read.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::EthernetError;
pub use parser::{EthernetHeader, ethernet_payload, format_mac, parse_ethernet_header};
