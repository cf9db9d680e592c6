//! UDP transport-layer decoding: four fixed 16-bit fields.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::UdpError;
pub use parser::{UdpHeader, parse_udp_header};
