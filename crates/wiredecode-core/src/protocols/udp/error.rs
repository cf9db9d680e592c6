use thiserror::Error;

use crate::protocols::common::reader::Truncated;

/// Errors returned by UDP decoding.
///
/// # Examples
/// ```
/// use wiredecode_core::protocols::udp::UdpError;
///
/// let err = UdpError::ShortPacket { needed: 8, actual: 2 };
/// assert!(err.to_string().contains("need 8 bytes"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UdpError {
    #[error("short UDP packet: need {needed} bytes, got {actual}")]
    ShortPacket { needed: usize, actual: usize },
}

impl From<Truncated> for UdpError {
    fn from(value: Truncated) -> Self {
        UdpError::ShortPacket {
            needed: value.needed,
            actual: value.actual,
        }
    }
}
