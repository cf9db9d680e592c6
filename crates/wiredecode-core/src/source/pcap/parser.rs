use std::fs::File;
use std::path::Path;

use pcap_parser::traits::PcapReaderIterator;
use pcap_parser::{Block, LegacyPcapReader, Linktype, PcapBlockOwned, PcapError, PcapNGReader};
use tracing::{debug, trace};

use crate::source::{PacketEvent, PacketSource, SourceError};

use super::error::PcapSourceError;
use super::layout;
use super::reader::{
    is_pcapng_magic, legacy_fraction_scale, legacy_ts_to_seconds, linktype_for_interface,
    pcapng_ts_to_seconds, read_magic_and_rewind,
};

/// Packet source reading a PCAP or PCAPNG file.
pub struct PcapFileSource {
    inner: CaptureReader,
}

enum CaptureReader {
    Legacy {
        reader: LegacyPcapReader<File>,
        linktype: Option<Linktype>,
        /// Seconds per unit of `ts_usec`, set from the file header magic.
        ts_scale: f64,
    },
    Ng {
        reader: PcapNGReader<File>,
        linktypes: Vec<Linktype>,
    },
}

impl PcapFileSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        let inner = open_reader(file)?;
        debug!(path = %path.display(), "opened capture file");
        Ok(Self { inner })
    }
}

impl PacketSource for PcapFileSource {
    fn next_packet(&mut self) -> Result<Option<PacketEvent>, SourceError> {
        Ok(self.inner.next_event()?)
    }
}

fn open_reader(mut file: File) -> Result<CaptureReader, PcapSourceError> {
    let magic = read_magic_and_rewind(&mut file)?;

    if is_pcapng_magic(&magic) {
        let reader = PcapNGReader::new(layout::READER_BUFFER_SIZE, file).map_err(|e| {
            PcapSourceError::Pcap {
                context: "pcapng reader init",
                message: e.to_string(),
            }
        })?;
        Ok(CaptureReader::Ng {
            reader,
            linktypes: Vec::new(),
        })
    } else {
        let reader = LegacyPcapReader::new(layout::READER_BUFFER_SIZE, file).map_err(|e| {
            PcapSourceError::Pcap {
                context: "pcap reader init",
                message: e.to_string(),
            }
        })?;
        Ok(CaptureReader::Legacy {
            reader,
            linktype: None,
            ts_scale: legacy_fraction_scale(false),
        })
    }
}

impl CaptureReader {
    fn next_event(&mut self) -> Result<Option<PacketEvent>, PcapSourceError> {
        match self {
            CaptureReader::Legacy {
                reader,
                linktype,
                ts_scale,
            } => {
                next_from(reader, "pcap", |block| match block {
                    PcapBlockOwned::LegacyHeader(header) => {
                        *linktype = Some(header.network);
                        *ts_scale = legacy_fraction_scale(header.is_nanosecond_precision());
                        None
                    }
                    PcapBlockOwned::Legacy(packet) => Some(PacketEvent {
                        ts: Some(legacy_ts_to_seconds(packet.ts_sec, packet.ts_usec, *ts_scale)),
                        linktype: linktype.unwrap_or(Linktype::ETHERNET),
                        data: packet.data.to_vec(),
                    }),
                    _ => None,
                })
            }
            CaptureReader::Ng { reader, linktypes } => {
                next_from(reader, "pcapng", |block| match block {
                    PcapBlockOwned::NG(Block::InterfaceDescription(intf)) => {
                        linktypes.push(intf.linktype);
                        None
                    }
                    PcapBlockOwned::NG(Block::EnhancedPacket(packet)) => Some(PacketEvent {
                        ts: Some(pcapng_ts_to_seconds(packet.ts_high, packet.ts_low)),
                        linktype: linktype_for_interface(linktypes, packet.if_id),
                        data: packet.data.to_vec(),
                    }),
                    _ => None,
                })
            }
        }
    }
}

/// Pull blocks until one maps to an event, refilling the buffer as needed.
fn next_from<R, F>(
    reader: &mut R,
    format: &'static str,
    mut on_block: F,
) -> Result<Option<PacketEvent>, PcapSourceError>
where
    R: PcapReaderIterator,
    F: FnMut(PcapBlockOwned<'_>) -> Option<PacketEvent>,
{
    loop {
        match reader.next() {
            Ok((offset, block)) => {
                let event = on_block(block);
                reader.consume(offset);
                if let Some(event) = event {
                    trace!(format, len = event.data.len(), "read capture frame");
                    return Ok(Some(event));
                }
            }
            Err(PcapError::Eof) => return Ok(None),
            Err(PcapError::Incomplete(_)) => {
                reader.refill().map_err(|e| PcapSourceError::Pcap {
                    context: "reader refill",
                    message: e.to_string(),
                })?;
            }
            Err(e) => {
                return Err(PcapSourceError::Pcap {
                    context: "reader next",
                    message: e.to_string(),
                });
            }
        }
    }
}
