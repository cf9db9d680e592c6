use std::net::Ipv4Addr;

use serde::Serialize;

use super::error::Ipv4Error;
use super::layout;
use super::reader::Ipv4Reader;

/// Decoded IPv4 header.
///
/// `header_len == 20 + options_len` and `header_len == ihl * 4` always hold
/// for a value produced by [`parse_ipv4_header`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ipv4Header<'a> {
    pub version: u8,
    pub ihl: u8,
    pub dscp: u8,
    pub ecn: u8,
    pub total_length: u16,
    pub identification: u16,
    pub flags: u8,
    pub fragment_offset: u16,
    pub ttl: u8,
    pub protocol: u8,
    pub checksum: u16,
    pub src_addr: Ipv4Addr,
    pub dst_addr: Ipv4Addr,
    pub options: &'a [u8],
    pub options_len: usize,
    pub header_len: usize,
}

impl Ipv4Header<'_> {
    pub fn dont_fragment(&self) -> bool {
        self.flags & layout::FLAG_DONT_FRAGMENT != 0
    }

    pub fn more_fragments(&self) -> bool {
        self.flags & layout::FLAG_MORE_FRAGMENTS != 0
    }

    /// True for every fragment except the first one.
    pub fn is_trailing_fragment(&self) -> bool {
        self.fragment_offset != 0
    }
}

/// Decode an IPv4 header at the start of `packet`.
///
/// # Errors
/// - `TruncatedHeader` when the buffer is shorter than 20 bytes or than the
///   length announced by the IHL.
/// - `InvalidHeaderLength` when the IHL is below five words.
///
/// # Examples
/// ```
/// use wiredecode_core::protocols::ipv4::parse_ipv4_header;
///
/// let mut packet = [0u8; 24];
/// packet[0] = 0x46;
/// packet[9] = 17;
/// packet[20..24].copy_from_slice(&[1, 1, 1, 0]);
///
/// let header = parse_ipv4_header(&packet)?;
/// assert_eq!(header.header_len, 24);
/// assert_eq!(header.options, &[1, 1, 1, 0]);
/// # Ok::<(), wiredecode_core::protocols::ipv4::Ipv4Error>(())
/// ```
pub fn parse_ipv4_header(packet: &[u8]) -> Result<Ipv4Header<'_>, Ipv4Error> {
    let reader = Ipv4Reader::new(packet);
    reader.require_len(layout::MIN_HEADER_LEN)?;

    let (version, ihl) = reader.read_version_ihl()?;
    if ihl < layout::MIN_IHL {
        return Err(Ipv4Error::InvalidHeaderLength { ihl });
    }
    let header_len = usize::from(ihl) * layout::WORD_LEN;
    reader.require_len(header_len)?;

    let (dscp, ecn) = reader.read_dscp_ecn()?;
    let total_length = reader.read_u16_be(layout::TOTAL_LENGTH_RANGE)?;
    let identification = reader.read_u16_be(layout::IDENTIFICATION_RANGE)?;
    let (flags, fragment_offset) = reader.read_flags_fragment()?;
    let ttl = reader.read_u8(layout::TTL_OFFSET)?;
    let protocol = reader.read_u8(layout::PROTOCOL_OFFSET)?;
    let checksum = reader.read_u16_be(layout::CHECKSUM_RANGE)?;
    let src_addr = reader.read_addr(layout::SRC_ADDR_RANGE)?;
    let dst_addr = reader.read_addr(layout::DST_ADDR_RANGE)?;

    let options_len = header_len - layout::MIN_HEADER_LEN;
    let options = reader.read_slice(layout::OPTIONS_OFFSET..header_len)?;

    Ok(Ipv4Header {
        version,
        ihl,
        dscp,
        ecn,
        total_length,
        identification,
        flags,
        fragment_offset,
        ttl,
        protocol,
        checksum,
        src_addr,
        dst_addr,
        options,
        options_len,
        header_len,
    })
}

/// Bytes carried after the header.
///
/// Clipped to `total_length` when that length is consistent with the header
/// and the buffer, which drops link-layer padding on short frames.
pub fn ipv4_payload<'a>(packet: &'a [u8], header: &Ipv4Header<'_>) -> &'a [u8] {
    let total = usize::from(header.total_length);
    let end = if total >= header.header_len && total <= packet.len() {
        total
    } else {
        packet.len()
    };
    packet.get(header.header_len..end).unwrap_or_default()
}
