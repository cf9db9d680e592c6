use std::io::{Read, Seek, SeekFrom};

use pcap_parser::Linktype;

use super::error::PcapSourceError;
use super::layout;

/// Read the four magic bytes and rewind to the start of the file.
///
/// # Errors
/// Returns `PcapSourceError::Io` when fewer than four bytes can be read or
/// the reader cannot seek back.
pub fn read_magic_and_rewind<R: Read + Seek>(reader: &mut R) -> Result<[u8; 4], PcapSourceError> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    reader.seek(SeekFrom::Start(0))?;
    Ok(magic)
}

pub fn is_pcapng_magic(magic: &[u8; 4]) -> bool {
    magic == &layout::PCAPNG_MAGIC
}

/// Link type announced for interface `if_id`; Ethernet when the interface
/// was never described.
pub fn linktype_for_interface(linktypes: &[Linktype], if_id: u32) -> Linktype {
    usize::try_from(if_id)
        .ok()
        .and_then(|index| linktypes.get(index).copied())
        .unwrap_or(Linktype::ETHERNET)
}

/// Seconds per unit of the legacy fractional timestamp field.
pub fn legacy_fraction_scale(nanosecond_precision: bool) -> f64 {
    if nanosecond_precision {
        layout::SECONDS_PER_NANO
    } else {
        layout::SECONDS_PER_MICRO
    }
}

/// `ts_frac` is microseconds or nanoseconds depending on the file magic;
/// `scale` comes from [`legacy_fraction_scale`].
pub fn legacy_ts_to_seconds(ts_sec: u32, ts_frac: u32, scale: f64) -> f64 {
    f64::from(ts_sec) + f64::from(ts_frac) * scale
}

/// PCAPNG timestamps are split in two 32-bit halves, in microseconds.
pub fn pcapng_ts_to_seconds(ts_high: u32, ts_low: u32) -> f64 {
    let ts = (u64::from(ts_high) << 32) | u64::from(ts_low);
    ts as f64 * layout::SECONDS_PER_MICRO
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use pcap_parser::Linktype;

    use super::{
        is_pcapng_magic, legacy_fraction_scale, legacy_ts_to_seconds, linktype_for_interface,
        pcapng_ts_to_seconds, read_magic_and_rewind,
    };
    use crate::source::pcap::error::PcapSourceError;
    use crate::source::pcap::layout;

    #[test]
    fn detect_pcapng_magic() {
        assert!(is_pcapng_magic(&layout::PCAPNG_MAGIC));
        assert!(!is_pcapng_magic(&[0xd4, 0xc3, 0xb2, 0xa1]));
    }

    #[test]
    fn read_magic_rewinds() {
        let mut cursor = Cursor::new([0xd4, 0xc3, 0xb2, 0xa1, 0x02]);
        let magic = read_magic_and_rewind(&mut cursor).unwrap();
        assert_eq!(magic, [0xd4, 0xc3, 0xb2, 0xa1]);
        let mut buf = [0u8; 1];
        cursor.read_exact(&mut buf).unwrap();
        assert_eq!(buf[0], 0xd4);
    }

    #[test]
    fn read_magic_too_short() {
        let mut cursor = Cursor::new([0x0a, 0x0d]);
        let err = read_magic_and_rewind(&mut cursor).unwrap_err();
        assert!(matches!(err, PcapSourceError::Io(_)));
    }

    #[test]
    fn unknown_interface_defaults_to_ethernet() {
        let linktypes = [Linktype::RAW];
        assert_eq!(linktype_for_interface(&linktypes, 0), Linktype::RAW);
        assert_eq!(linktype_for_interface(&linktypes, 3), Linktype::ETHERNET);
    }

    #[test]
    fn timestamps_convert_to_seconds() {
        let micros = legacy_fraction_scale(false);
        let nanos = legacy_fraction_scale(true);
        assert!((legacy_ts_to_seconds(10, 250_000, micros) - 10.25).abs() < 1e-9);
        assert!((legacy_ts_to_seconds(1, 500_000_000, nanos) - 1.5).abs() < 1e-9);
        assert!((pcapng_ts_to_seconds(0, 1_500_000) - 1.5).abs() < 1e-9);
    }
}
