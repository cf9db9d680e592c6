use super::error::TcpError;
use super::layout;
use super::parser::TcpFlags;
use crate::protocols::common::reader::{FieldReader, bit_field, bit_flag};

pub struct TcpReader<'a> {
    fields: FieldReader<'a>,
}

impl<'a> TcpReader<'a> {
    pub fn new(segment: &'a [u8]) -> Self {
        Self {
            fields: FieldReader::new(segment),
        }
    }

    pub fn require_header(&self) -> Result<(), TcpError> {
        Ok(self.fields.require_len(layout::MIN_HEADER_LEN)?)
    }

    pub fn read_u16_be(&self, range: std::ops::Range<usize>) -> Result<u16, TcpError> {
        Ok(self.fields.read_u16_be(range)?)
    }

    pub fn read_u32_be(&self, range: std::ops::Range<usize>) -> Result<u32, TcpError> {
        Ok(self.fields.read_u32_be(range)?)
    }

    /// Data offset (high nibble) and the three reserved bits of byte 12.
    pub fn read_data_offset_reserved(&self) -> Result<(u8, u8), TcpError> {
        let byte = self.fields.read_u8(layout::DATA_OFFSET_OFFSET)?;
        Ok((
            bit_field(byte, layout::DATA_OFFSET_SHIFT, 4),
            bit_field(byte, layout::RESERVED_SHIFT, 3),
        ))
    }

    /// NS from bit 0 of byte 12, the other eight flags from byte 13.
    pub fn read_flags(&self) -> Result<TcpFlags, TcpError> {
        let offset_byte = self.fields.read_u8(layout::DATA_OFFSET_OFFSET)?;
        let flags_byte = self.fields.read_u8(layout::FLAGS_OFFSET)?;
        Ok(TcpFlags {
            ns: bit_flag(offset_byte, layout::NS_BIT),
            cwr: bit_flag(flags_byte, layout::CWR_BIT),
            ece: bit_flag(flags_byte, layout::ECE_BIT),
            urg: bit_flag(flags_byte, layout::URG_BIT),
            ack: bit_flag(flags_byte, layout::ACK_BIT),
            psh: bit_flag(flags_byte, layout::PSH_BIT),
            rst: bit_flag(flags_byte, layout::RST_BIT),
            syn: bit_flag(flags_byte, layout::SYN_BIT),
            fin: bit_flag(flags_byte, layout::FIN_BIT),
        })
    }

    /// Options bytes up to `header_len`, or up to the end of the buffer when
    /// the announced header does not fit.
    pub fn read_options(&self, header_len: usize) -> Result<&'a [u8], TcpError> {
        let end = header_len.min(self.fields.len());
        Ok(self.fields.read_slice(layout::OPTIONS_OFFSET..end)?)
    }

    pub fn fits(&self, header_len: usize) -> bool {
        header_len <= self.fields.len()
    }
}
