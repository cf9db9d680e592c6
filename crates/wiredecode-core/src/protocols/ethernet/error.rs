use thiserror::Error;

use crate::protocols::common::reader::Truncated;

/// Errors returned by Ethernet decoding.
///
/// # Examples
/// ```
/// use wiredecode_core::protocols::ethernet::EthernetError;
///
/// let err = EthernetError::ShortFrame { needed: 14, actual: 3 };
/// assert!(err.to_string().contains("short Ethernet frame"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EthernetError {
    #[error("short Ethernet frame: need {needed} bytes, got {actual}")]
    ShortFrame { needed: usize, actual: usize },
}

impl From<Truncated> for EthernetError {
    fn from(value: Truncated) -> Self {
        EthernetError::ShortFrame {
            needed: value.needed,
            actual: value.actual,
        }
    }
}
