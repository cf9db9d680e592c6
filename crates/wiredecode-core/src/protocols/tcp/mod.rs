//! TCP transport-layer decoding.
//!
//! The fixed 20-byte header is decoded first. The data offset then announces
//! where options end; it must be at least five words. The options region is
//! either captured as an opaque slice or walked option by option:
//!
//! - kind 0 ends the walk, kind 1 is a single padding byte;
//! - every other kind carries a declared length byte that is checked against
//!   the kind's rule (see `options`) and against the remaining region before
//!   any payload byte is read;
//! - each decoded option may appear once per header.
//!
//! Unknown kinds are rejected unless the caller opts into skipping them by
//! their declared length (`UnknownOptionPolicy::Skip`). Every failure is a
//! `TcpError` value; malformed input never panics.

pub mod config;
pub mod error;
pub mod layout;
pub mod options;
pub mod parser;
pub mod reader;

pub use config::{TcpDecodeConfig, UnknownOptionPolicy};
pub use error::{OptionFault, TcpError};
pub use options::{TcpOptions, TcpTimestamp};
pub use parser::{TcpFlags, TcpHeader, parse_tcp_header, parse_tcp_header_with};
