use std::net::Ipv4Addr;

use super::error::Ipv4Error;
use super::layout;
use crate::protocols::common::reader::{FieldReader, bit_field};

pub struct Ipv4Reader<'a> {
    fields: FieldReader<'a>,
}

impl<'a> Ipv4Reader<'a> {
    pub fn new(packet: &'a [u8]) -> Self {
        Self {
            fields: FieldReader::new(packet),
        }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), Ipv4Error> {
        Ok(self.fields.require_len(needed)?)
    }

    /// Version (high nibble) and IHL (low nibble) of byte 0.
    pub fn read_version_ihl(&self) -> Result<(u8, u8), Ipv4Error> {
        let byte = self.fields.read_u8(layout::VERSION_IHL_OFFSET)?;
        Ok((
            bit_field(byte, layout::VERSION_SHIFT, 4),
            bit_field(byte, 0, 4),
        ))
    }

    /// DSCP (top six bits) and ECN (bottom two bits) of byte 1.
    pub fn read_dscp_ecn(&self) -> Result<(u8, u8), Ipv4Error> {
        let byte = self.fields.read_u8(layout::DSCP_ECN_OFFSET)?;
        Ok((
            bit_field(byte, layout::DSCP_SHIFT, 6),
            bit_field(byte, 0, 2),
        ))
    }

    /// Flags (top three bits) and fragment offset (low 13 bits) of bytes 6-7.
    pub fn read_flags_fragment(&self) -> Result<(u8, u16), Ipv4Error> {
        let value = self.fields.read_u16_be(layout::FLAGS_FRAGMENT_RANGE)?;
        Ok((
            (value >> layout::FLAGS_SHIFT) as u8,
            value & layout::FRAGMENT_OFFSET_MASK,
        ))
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, Ipv4Error> {
        Ok(self.fields.read_u8(offset)?)
    }

    pub fn read_u16_be(&self, range: std::ops::Range<usize>) -> Result<u16, Ipv4Error> {
        Ok(self.fields.read_u16_be(range)?)
    }

    pub fn read_addr(&self, range: std::ops::Range<usize>) -> Result<Ipv4Addr, Ipv4Error> {
        Ok(Ipv4Addr::from(self.fields.read_u32_be(range)?))
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], Ipv4Error> {
        Ok(self.fields.read_slice(range)?)
    }
}
