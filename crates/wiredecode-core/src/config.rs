use serde::{Deserialize, Serialize};

use crate::protocols::tcp::TcpDecodeConfig;

/// Settings applied when chaining decoders over whole frames.
///
/// # Examples
/// ```
/// use wiredecode_core::DecodeConfig;
///
/// let config: DecodeConfig = serde_json::from_str(r#"{"tcp":{"parse_options":false}}"#)?;
/// assert!(!config.tcp.parse_options);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    pub tcp: TcpDecodeConfig,
}
