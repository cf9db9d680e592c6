//! Shared field codec.
//!
//! Every multi-byte header field is big-endian and assembled by shifting and
//! OR-ing bytes in network order. Sub-byte fields are extracted with
//! shift-and-mask on the containing byte. Protocol readers go through these
//! helpers so the convention stays identical across decoders.

use std::ops::Range;

/// Bounds failure shared by all protocol readers.
///
/// Each protocol maps it into its own "short" error variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Truncated {
    pub needed: usize,
    pub actual: usize,
}

/// Assemble up to eight bytes into an unsigned integer, most significant first.
pub(crate) fn assemble_be(bytes: &[u8]) -> u64 {
    debug_assert!(bytes.len() <= 8);
    bytes
        .iter()
        .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte))
}

/// Extract `width` bits starting `shift` bits above the least significant bit.
pub(crate) fn bit_field(byte: u8, shift: u32, width: u32) -> u8 {
    debug_assert!(shift + width <= 8);
    let mask = ((1u16 << width) - 1) as u8;
    (byte >> shift) & mask
}

pub(crate) fn bit_flag(byte: u8, bit: u32) -> bool {
    bit_field(byte, bit, 1) == 1
}

/// Bounds-checked view over a header buffer.
///
/// All reads validate the requested range before touching a byte.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FieldReader<'a> {
    bytes: &'a [u8],
}

impl<'a> FieldReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn require_len(&self, needed: usize) -> Result<(), Truncated> {
        if self.bytes.len() < needed {
            return Err(Truncated {
                needed,
                actual: self.bytes.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, Truncated> {
        self.bytes.get(offset).copied().ok_or(Truncated {
            needed: offset + 1,
            actual: self.bytes.len(),
        })
    }

    pub fn read_slice(&self, range: Range<usize>) -> Result<&'a [u8], Truncated> {
        self.bytes.get(range.clone()).ok_or(Truncated {
            needed: range.end,
            actual: self.bytes.len(),
        })
    }

    pub fn read_u16_be(&self, range: Range<usize>) -> Result<u16, Truncated> {
        self.read_be(range, 2).map(|value| value as u16)
    }

    pub fn read_u32_be(&self, range: Range<usize>) -> Result<u32, Truncated> {
        self.read_be(range, 4).map(|value| value as u32)
    }

    /// Read a 48-bit field (MAC addresses) into the low bits of a `u64`.
    pub fn read_u48_be(&self, range: Range<usize>) -> Result<u64, Truncated> {
        self.read_be(range, 6)
    }

    fn read_be(&self, range: Range<usize>, width: usize) -> Result<u64, Truncated> {
        let bytes = self.read_slice(range)?;
        if bytes.len() != width {
            return Err(Truncated {
                needed: width,
                actual: bytes.len(),
            });
        }
        Ok(assemble_be(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldReader, Truncated, assemble_be, bit_field, bit_flag};

    #[test]
    fn assemble_be_uses_network_order() {
        assert_eq!(assemble_be(&[0x05, 0xb4]), 1460);
        assert_eq!(assemble_be(&[0xde, 0xad, 0xbe, 0xef]), 0xdead_beef);
        assert_eq!(assemble_be(&[]), 0);
    }

    #[test]
    fn bit_field_extracts_nibbles_and_bits() {
        assert_eq!(bit_field(0x45, 4, 4), 4);
        assert_eq!(bit_field(0x45, 0, 4), 5);
        assert_eq!(bit_field(0xb9, 2, 6), 0x2e);
        assert_eq!(bit_field(0xb9, 0, 2), 0x01);
        assert!(bit_flag(0x80, 7));
        assert!(!bit_flag(0x7f, 7));
    }

    #[test]
    fn read_u48_assembles_mac() {
        let bytes = [0x00, 0x1b, 0x21, 0x3c, 0x4d, 0x5e, 0xff];
        let reader = FieldReader::new(&bytes);
        assert_eq!(reader.read_u48_be(0..6).unwrap(), 0x001b_213c_4d5e);
    }

    #[test]
    fn reads_out_of_range_are_rejected() {
        let bytes = [0u8; 3];
        let reader = FieldReader::new(&bytes);
        assert_eq!(
            reader.read_u32_be(0..4),
            Err(Truncated {
                needed: 4,
                actual: 3
            })
        );
        assert_eq!(
            reader.read_u8(3),
            Err(Truncated {
                needed: 4,
                actual: 3
            })
        );
        assert!(reader.require_len(3).is_ok());
    }
}
