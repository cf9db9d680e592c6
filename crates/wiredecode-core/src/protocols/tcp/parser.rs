use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::config::TcpDecodeConfig;
use super::error::TcpError;
use super::layout;
use super::options::{TcpOptions, walk_options};
use super::reader::TcpReader;

/// The nine TCP control bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TcpFlags {
    pub ns: bool,
    pub cwr: bool,
    pub ece: bool,
    pub urg: bool,
    pub ack: bool,
    pub psh: bool,
    pub rst: bool,
    pub syn: bool,
    pub fin: bool,
}

impl TcpFlags {
    /// Names of the set flags, in header order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        [
            (self.ns, "NS"),
            (self.cwr, "CWR"),
            (self.ece, "ECE"),
            (self.urg, "URG"),
            (self.ack, "ACK"),
            (self.psh, "PSH"),
            (self.rst, "RST"),
            (self.syn, "SYN"),
            (self.fin, "FIN"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
    }
}

impl fmt::Display for TcpFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.names().collect();
        f.write_str(&names.join(","))
    }
}

/// Decoded TCP header.
///
/// `options` borrows the caller's buffer. `parsed_options` is `None` when
/// the options were captured opaque, either on request or because the
/// announced header does not fit the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TcpHeader<'a> {
    pub src_port: u16,
    pub dst_port: u16,
    pub seq_number: u32,
    pub ack_number: u32,
    pub data_offset: u8,
    pub reserved: u8,
    pub flags: TcpFlags,
    pub window_size: u16,
    pub checksum: u16,
    pub urgent_pointer: u16,
    pub header_len: usize,
    pub options_len: usize,
    pub options: &'a [u8],
    pub parsed_options: Option<TcpOptions>,
}

/// Decode a TCP header, walking its options when `parse_options` is set.
///
/// Unknown option kinds are rejected; see [`parse_tcp_header_with`] for the
/// lenient policy.
///
/// # Examples
/// ```
/// use wiredecode_core::protocols::tcp::parse_tcp_header;
///
/// let mut segment = vec![0u8; 20];
/// segment[12] = 6 << 4;
/// segment[13] = 0x02;
/// segment.extend_from_slice(&[2, 4, 0x05, 0xb4]);
///
/// let header = parse_tcp_header(&segment, true)?;
/// assert!(header.flags.syn);
/// assert_eq!(header.parsed_options.and_then(|o| o.mss), Some(1460));
/// # Ok::<(), wiredecode_core::protocols::tcp::TcpError>(())
/// ```
pub fn parse_tcp_header(segment: &[u8], parse_options: bool) -> Result<TcpHeader<'_>, TcpError> {
    let config = TcpDecodeConfig {
        parse_options,
        ..TcpDecodeConfig::default()
    };
    parse_tcp_header_with(segment, &config)
}

/// Decode a TCP header under an explicit configuration.
///
/// # Errors
/// - `ShortPacket` when fewer than 20 bytes are supplied.
/// - `InvalidDataOffset` when the data offset is below five words.
/// - `MalformedOption` when options are walked and one breaks its length
///   rule, runs past the options region, repeats, or has an unknown kind
///   under the strict policy.
pub fn parse_tcp_header_with<'a>(
    segment: &'a [u8],
    config: &TcpDecodeConfig,
) -> Result<TcpHeader<'a>, TcpError> {
    let reader = TcpReader::new(segment);
    reader.require_header()?;

    let src_port = reader.read_u16_be(layout::SRC_PORT_RANGE)?;
    let dst_port = reader.read_u16_be(layout::DST_PORT_RANGE)?;
    let seq_number = reader.read_u32_be(layout::SEQ_NUMBER_RANGE)?;
    let ack_number = reader.read_u32_be(layout::ACK_NUMBER_RANGE)?;
    let (data_offset, reserved) = reader.read_data_offset_reserved()?;
    let flags = reader.read_flags()?;
    let window_size = reader.read_u16_be(layout::WINDOW_SIZE_RANGE)?;
    let checksum = reader.read_u16_be(layout::CHECKSUM_RANGE)?;
    let urgent_pointer = reader.read_u16_be(layout::URGENT_POINTER_RANGE)?;

    if data_offset < layout::MIN_DATA_OFFSET {
        debug!(data_offset, "rejecting TCP header with short data offset");
        return Err(TcpError::InvalidDataOffset { data_offset });
    }
    let header_len = usize::from(data_offset) * layout::WORD_LEN;
    let options_len = header_len - layout::MIN_HEADER_LEN;
    let options = reader.read_options(header_len)?;

    let parsed_options = if !config.parse_options {
        None
    } else if !reader.fits(header_len) {
        debug!(
            header_len,
            available = segment.len(),
            "TCP header exceeds buffer, options captured opaque"
        );
        None
    } else {
        Some(walk_options(
            options,
            layout::OPTIONS_OFFSET,
            config.unknown_options,
        )?)
    };

    Ok(TcpHeader {
        src_port,
        dst_port,
        seq_number,
        ack_number,
        data_offset,
        reserved,
        flags,
        window_size,
        checksum,
        urgent_pointer,
        header_len,
        options_len,
        options,
        parsed_options,
    })
}

#[cfg(test)]
mod tests {
    use super::{TcpFlags, parse_tcp_header, parse_tcp_header_with};
    use crate::protocols::tcp::config::{TcpDecodeConfig, UnknownOptionPolicy};
    use crate::protocols::tcp::error::{OptionFault, TcpError};
    use crate::protocols::tcp::layout;

    fn fixed_header(data_offset: u8) -> Vec<u8> {
        let mut segment = vec![0u8; layout::MIN_HEADER_LEN];
        segment[layout::SRC_PORT_RANGE].copy_from_slice(&443u16.to_be_bytes());
        segment[layout::DST_PORT_RANGE].copy_from_slice(&51000u16.to_be_bytes());
        segment[layout::SEQ_NUMBER_RANGE].copy_from_slice(&0xdead_beefu32.to_be_bytes());
        segment[layout::ACK_NUMBER_RANGE].copy_from_slice(&7u32.to_be_bytes());
        segment[layout::DATA_OFFSET_OFFSET] = data_offset << 4;
        segment[layout::FLAGS_OFFSET] = 0x12;
        segment[layout::WINDOW_SIZE_RANGE].copy_from_slice(&65535u16.to_be_bytes());
        segment[layout::CHECKSUM_RANGE].copy_from_slice(&0x0badu16.to_be_bytes());
        segment[layout::URGENT_POINTER_RANGE].copy_from_slice(&3u16.to_be_bytes());
        segment
    }

    #[test]
    fn parse_fixed_fields() {
        let segment = fixed_header(5);
        let header = parse_tcp_header(&segment, true).unwrap();

        assert_eq!(header.src_port, 443);
        assert_eq!(header.dst_port, 51000);
        assert_eq!(header.seq_number, 0xdead_beef);
        assert_eq!(header.ack_number, 7);
        assert_eq!(header.data_offset, 5);
        assert_eq!(header.reserved, 0);
        assert_eq!(header.window_size, 65535);
        assert_eq!(header.checksum, 0x0bad);
        assert_eq!(header.urgent_pointer, 3);
        assert_eq!(header.header_len, 20);
        assert_eq!(header.options_len, 0);
        assert!(header.options.is_empty());
        assert_eq!(header.parsed_options, Some(Default::default()));
        assert_eq!(header.flags.to_string(), "ACK,SYN");
    }

    #[test]
    fn parse_all_flags() {
        let mut segment = fixed_header(5);
        segment[layout::DATA_OFFSET_OFFSET] |= 0x01;
        segment[layout::FLAGS_OFFSET] = 0xff;
        let header = parse_tcp_header(&segment, false).unwrap();
        assert_eq!(header.flags.names().count(), 9);
        assert_eq!(
            header.flags.to_string(),
            "NS,CWR,ECE,URG,ACK,PSH,RST,SYN,FIN"
        );
        assert_eq!(TcpFlags::default().to_string(), "");
    }

    #[test]
    fn parse_mss_and_nops() {
        let mut segment = fixed_header(8);
        segment.extend_from_slice(&[2, 4, 0x05, 0xb4, 1, 1, 0, 0, 0, 0, 0, 0]);

        let header = parse_tcp_header(&segment, true).unwrap();
        assert_eq!(header.header_len, 32);
        assert_eq!(header.options_len, 12);
        assert_eq!(header.options.len(), 12);
        let options = header.parsed_options.unwrap();
        assert_eq!(options.mss, Some(1460));
        assert_eq!(options.nop_count, 2);
        assert!(options.sack.is_empty());
        assert_eq!(options.timestamp, None);
    }

    #[test]
    fn malformed_mss_is_an_error() {
        let mut segment = fixed_header(6);
        segment.extend_from_slice(&[2, 5, 0x05, 0xb4]);

        let err = parse_tcp_header(&segment, true).unwrap_err();
        assert_eq!(
            err,
            TcpError::MalformedOption {
                kind: 2,
                offset: 20,
                fault: OptionFault::LengthMismatch {
                    expected: 4,
                    declared: 5
                }
            }
        );
    }

    #[test]
    fn opaque_mode_ignores_option_contents() {
        let mut segment = fixed_header(7);
        segment.extend_from_slice(&[2, 9, 0xff, 0xff, 77, 0, 0, 0]);
        segment.extend_from_slice(b"payload");

        let header = parse_tcp_header(&segment, false).unwrap();
        assert_eq!(header.options, &segment[20..28]);
        assert_eq!(header.options_len, 8);
        assert_eq!(header.parsed_options, None);
    }

    #[test]
    fn header_longer_than_buffer_is_captured_opaque() {
        let mut segment = fixed_header(15);
        segment.extend_from_slice(&[2, 4, 0x05, 0xb4]);

        for parse_options in [true, false] {
            let header = parse_tcp_header(&segment, parse_options).unwrap();
            assert_eq!(header.header_len, 60);
            assert_eq!(header.options_len, 40);
            assert_eq!(header.options, &[2, 4, 0x05, 0xb4]);
            assert_eq!(header.parsed_options, None);
        }
    }

    #[test]
    fn data_offset_below_minimum() {
        for data_offset in 0..layout::MIN_DATA_OFFSET {
            let segment = fixed_header(data_offset);
            let err = parse_tcp_header(&segment, false).unwrap_err();
            assert_eq!(err, TcpError::InvalidDataOffset { data_offset });
        }
    }

    #[test]
    fn short_packet() {
        for len in 0..layout::MIN_HEADER_LEN {
            let segment = vec![0x50u8; len];
            let err = parse_tcp_header(&segment, true).unwrap_err();
            assert_eq!(
                err,
                TcpError::ShortPacket {
                    needed: layout::MIN_HEADER_LEN,
                    actual: len
                }
            );
        }
    }

    #[test]
    fn unknown_option_policy() {
        let mut segment = fixed_header(6);
        segment.extend_from_slice(&[254, 4, 0xf9, 0x89]);

        let err = parse_tcp_header(&segment, true).unwrap_err();
        assert!(matches!(
            err,
            TcpError::MalformedOption {
                kind: 254,
                fault: OptionFault::UnknownKind,
                ..
            }
        ));

        let config = TcpDecodeConfig::default().with_unknown_options(UnknownOptionPolicy::Skip);
        let header = parse_tcp_header_with(&segment, &config).unwrap();
        assert_eq!(header.parsed_options.unwrap().skipped_kinds, vec![254]);
    }
}
