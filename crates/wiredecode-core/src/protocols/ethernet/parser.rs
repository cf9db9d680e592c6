use serde::Serialize;

use super::error::EthernetError;
use super::layout;
use super::reader::EthernetReader;

/// Decoded Ethernet II header. MAC addresses occupy the low 48 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EthernetHeader {
    pub dst_mac: u64,
    pub src_mac: u64,
    pub ether_type: u16,
}

impl EthernetHeader {
    pub fn is_ipv4(&self) -> bool {
        self.ether_type == layout::ETHER_TYPE_IPV4
    }
}

/// Decode the fixed 14-byte Ethernet header at the start of `frame`.
///
/// # Errors
/// Returns `EthernetError::ShortFrame` when fewer than 14 bytes are supplied.
///
/// # Examples
/// ```
/// use wiredecode_core::protocols::ethernet::parse_ethernet_header;
///
/// let mut frame = [0u8; 14];
/// frame[..6].copy_from_slice(&[0xff; 6]);
/// frame[12..14].copy_from_slice(&0x0800u16.to_be_bytes());
///
/// let header = parse_ethernet_header(&frame)?;
/// assert_eq!(header.dst_mac, 0xffff_ffff_ffff);
/// assert!(header.is_ipv4());
/// # Ok::<(), wiredecode_core::protocols::ethernet::EthernetError>(())
/// ```
pub fn parse_ethernet_header(frame: &[u8]) -> Result<EthernetHeader, EthernetError> {
    let reader = EthernetReader::new(frame);
    reader.require_header()?;

    let dst_mac = reader.read_mac(layout::DST_MAC_RANGE)?;
    let src_mac = reader.read_mac(layout::SRC_MAC_RANGE)?;
    let ether_type = reader.read_ether_type()?;

    Ok(EthernetHeader {
        dst_mac,
        src_mac,
        ether_type,
    })
}

/// Bytes following the Ethernet header, for chaining into the next decoder.
pub fn ethernet_payload(frame: &[u8]) -> Result<&[u8], EthernetError> {
    let reader = EthernetReader::new(frame);
    reader.require_header()?;
    reader.payload()
}

/// Format a 48-bit MAC address as colon-separated lowercase hex.
pub fn format_mac(mac: u64) -> String {
    (0..6)
        .rev()
        .map(|shift| format!("{:02x}", (mac >> (shift * 8)) as u8))
        .collect::<Vec<_>>()
        .join(":")
}
