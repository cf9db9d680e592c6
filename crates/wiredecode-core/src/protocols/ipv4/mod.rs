//! IPv4 network-layer decoding.
//!
//! The IHL nibble announces the header length in 32-bit words. The buffer
//! must hold at least the fixed 20 bytes and everything the IHL announces;
//! the trailing options region is exposed as an opaque slice. An IHL below
//! five is rejected instead of underflowing the options length.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::Ipv4Error;
pub use parser::{Ipv4Header, ipv4_payload, parse_ipv4_header};
