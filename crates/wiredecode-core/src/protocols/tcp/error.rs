use thiserror::Error;

use crate::protocols::common::reader::Truncated;

/// Errors returned by TCP decoding.
///
/// # Examples
/// ```
/// use wiredecode_core::protocols::tcp::{OptionFault, TcpError};
///
/// let err = TcpError::MalformedOption {
///     kind: 2,
///     offset: 20,
///     fault: OptionFault::LengthMismatch { expected: 4, declared: 5 },
/// };
/// assert!(err.to_string().contains("declared length 5, expected 4"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TcpError {
    #[error("short TCP packet: need {needed} bytes, got {actual}")]
    ShortPacket { needed: usize, actual: usize },
    #[error("invalid TCP data offset: {data_offset} words is below the 5-word minimum")]
    InvalidDataOffset { data_offset: u8 },
    /// `offset` is the position of the option's kind byte from the start of
    /// the TCP header.
    #[error("malformed TCP option (kind {kind}) at offset {offset}: {fault}")]
    MalformedOption {
        kind: u8,
        offset: usize,
        fault: OptionFault,
    },
}

/// Rule an option violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OptionFault {
    #[error("declared length {declared}, expected {expected}")]
    LengthMismatch { expected: u8, declared: u8 },
    #[error("declared SACK length {declared} does not hold whole blocks")]
    SackLength { declared: u8 },
    #[error("declared length {declared} is shorter than the option header")]
    LengthTooShort { declared: u8 },
    #[error("option needs {needed} bytes, {available} left in the options region")]
    Truncated { needed: usize, available: usize },
    #[error("unknown option kind")]
    UnknownKind,
    #[error("option appears more than once")]
    Duplicate,
}

impl From<Truncated> for TcpError {
    fn from(value: Truncated) -> Self {
        TcpError::ShortPacket {
            needed: value.needed,
            actual: value.actual,
        }
    }
}
