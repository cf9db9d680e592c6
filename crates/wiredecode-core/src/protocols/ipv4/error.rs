use thiserror::Error;

use crate::protocols::common::reader::Truncated;

/// Errors returned by IPv4 decoding.
///
/// # Examples
/// ```
/// use wiredecode_core::protocols::ipv4::Ipv4Error;
///
/// let err = Ipv4Error::InvalidHeaderLength { ihl: 3 };
/// assert!(err.to_string().contains("IHL 3"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Ipv4Error {
    #[error("truncated IPv4 header: need {needed} bytes, got {actual}")]
    TruncatedHeader { needed: usize, actual: usize },
    #[error("invalid IPv4 header length: IHL {ihl} is below the 5-word minimum")]
    InvalidHeaderLength { ihl: u8 },
}

impl From<Truncated> for Ipv4Error {
    fn from(value: Truncated) -> Self {
        Ipv4Error::TruncatedHeader {
            needed: value.needed,
            actual: value.actual,
        }
    }
}
