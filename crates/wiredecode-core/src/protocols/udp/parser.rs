use serde::Serialize;

use super::error::UdpError;
use super::layout;
use super::reader::UdpReader;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UdpHeader {
    pub src_port: u16,
    pub dst_port: u16,
    pub length: u16,
    pub checksum: u16,
}

impl UdpHeader {
    /// Payload length announced by the header, zero when the length field is
    /// smaller than the header itself.
    pub fn payload_len(&self) -> usize {
        usize::from(self.length).saturating_sub(layout::HEADER_LEN)
    }
}

/// Decode the fixed 8-byte UDP header at the start of `packet`.
///
/// # Errors
/// Returns `UdpError::ShortPacket` when fewer than 8 bytes are supplied.
pub fn parse_udp_header(packet: &[u8]) -> Result<UdpHeader, UdpError> {
    let reader = UdpReader::new(packet);
    reader.require_header()?;

    Ok(UdpHeader {
        src_port: reader.read_u16_be(layout::SRC_PORT_RANGE)?,
        dst_port: reader.read_u16_be(layout::DST_PORT_RANGE)?,
        length: reader.read_u16_be(layout::LENGTH_RANGE)?,
        checksum: reader.read_u16_be(layout::CHECKSUM_RANGE)?,
    })
}

#[cfg(test)]
mod tests {
    use super::parse_udp_header;
    use crate::protocols::udp::error::UdpError;
    use crate::protocols::udp::layout;

    #[test]
    fn parse_valid_header() {
        let packet = [0x19, 0x36, 0x00, 0x35, 0x00, 0x0c, 0xab, 0xcd, 1, 2, 3, 4];
        let header = parse_udp_header(&packet).unwrap();
        assert_eq!(header.src_port, 6454);
        assert_eq!(header.dst_port, 53);
        assert_eq!(header.length, 12);
        assert_eq!(header.checksum, 0xabcd);
        assert_eq!(header.payload_len(), 4);
    }

    #[test]
    fn parse_short_packet() {
        for len in 0..layout::HEADER_LEN {
            let packet = vec![0u8; len];
            let err = parse_udp_header(&packet).unwrap_err();
            assert_eq!(
                err,
                UdpError::ShortPacket {
                    needed: layout::HEADER_LEN,
                    actual: len
                }
            );
        }
    }

    #[test]
    fn payload_len_saturates() {
        let packet = [0, 1, 0, 2, 0, 3, 0, 0];
        let header = parse_udp_header(&packet).unwrap();
        assert_eq!(header.payload_len(), 0);
    }
}
