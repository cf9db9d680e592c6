use super::error::EthernetError;
use super::layout;
use crate::protocols::common::reader::FieldReader;

pub struct EthernetReader<'a> {
    fields: FieldReader<'a>,
}

impl<'a> EthernetReader<'a> {
    pub fn new(frame: &'a [u8]) -> Self {
        Self {
            fields: FieldReader::new(frame),
        }
    }

    pub fn require_header(&self) -> Result<(), EthernetError> {
        Ok(self.fields.require_len(layout::HEADER_LEN)?)
    }

    pub fn read_mac(&self, range: std::ops::Range<usize>) -> Result<u64, EthernetError> {
        Ok(self.fields.read_u48_be(range)?)
    }

    pub fn read_ether_type(&self) -> Result<u16, EthernetError> {
        Ok(self.fields.read_u16_be(layout::ETHER_TYPE_RANGE)?)
    }

    pub fn payload(&self) -> Result<&'a [u8], EthernetError> {
        Ok(self
            .fields
            .read_slice(layout::HEADER_LEN..self.fields.len())?)
    }
}
