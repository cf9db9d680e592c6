use serde::{Deserialize, Serialize};

/// What to do with an option kind the decoder has no handler for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownOptionPolicy {
    /// Fail with `OptionFault::UnknownKind`.
    #[default]
    Reject,
    /// Skip the option using its declared length and record its kind.
    Skip,
}

/// TCP decoding knobs.
///
/// # Examples
/// ```
/// use wiredecode_core::protocols::tcp::{TcpDecodeConfig, UnknownOptionPolicy};
///
/// let config = TcpDecodeConfig::default().with_unknown_options(UnknownOptionPolicy::Skip);
/// assert!(config.parse_options);
/// assert!(!TcpDecodeConfig::opaque().parse_options);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TcpDecodeConfig {
    /// Walk the options region; when false it is returned opaque.
    pub parse_options: bool,
    pub unknown_options: UnknownOptionPolicy,
}

impl Default for TcpDecodeConfig {
    fn default() -> Self {
        Self {
            parse_options: true,
            unknown_options: UnknownOptionPolicy::default(),
        }
    }
}

impl TcpDecodeConfig {
    pub fn opaque() -> Self {
        Self {
            parse_options: false,
            ..Self::default()
        }
    }

    pub fn with_unknown_options(self, unknown_options: UnknownOptionPolicy) -> Self {
        Self {
            unknown_options,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{TcpDecodeConfig, UnknownOptionPolicy};

    #[test]
    fn default_parses_strictly() {
        let config = TcpDecodeConfig::default();
        assert!(config.parse_options);
        assert_eq!(config.unknown_options, UnknownOptionPolicy::Reject);
    }

    #[test]
    fn deserialize_fills_missing_fields() {
        let config: TcpDecodeConfig =
            serde_json::from_str(r#"{"unknown_options":"skip"}"#).expect("config json");
        assert!(config.parse_options);
        assert_eq!(config.unknown_options, UnknownOptionPolicy::Skip);
    }
}
