use super::error::UdpError;
use super::layout;
use crate::protocols::common::reader::FieldReader;

pub struct UdpReader<'a> {
    fields: FieldReader<'a>,
}

impl<'a> UdpReader<'a> {
    pub fn new(packet: &'a [u8]) -> Self {
        Self {
            fields: FieldReader::new(packet),
        }
    }

    pub fn require_header(&self) -> Result<(), UdpError> {
        Ok(self.fields.require_len(layout::HEADER_LEN)?)
    }

    pub fn read_u16_be(&self, range: std::ops::Range<usize>) -> Result<u16, UdpError> {
        Ok(self.fields.read_u16_be(range)?)
    }
}
