use std::collections::BTreeMap;

use crate::protocols::ethernet::{EthernetHeader, format_mac};
use crate::protocols::ipv4::Ipv4Header;
use crate::protocols::tcp::TcpHeader;
use crate::protocols::udp::UdpHeader;
use crate::{
    CaptureSummary, ErrorSummary, EthernetRecord, FrameError, FrameRecord, Ipv4Record, TcpRecord,
    UdpRecord,
};

use super::dissect::{DecodeError, Dissection, Transport};

/// At most this many frame indices are kept per error identifier.
const MAX_ERROR_EXAMPLES: usize = 3;

impl From<&EthernetHeader> for EthernetRecord {
    fn from(header: &EthernetHeader) -> Self {
        Self {
            src: format_mac(header.src_mac),
            dst: format_mac(header.dst_mac),
            ether_type: header.ether_type,
        }
    }
}

impl From<&Ipv4Header<'_>> for Ipv4Record {
    fn from(header: &Ipv4Header<'_>) -> Self {
        Self {
            src: header.src_addr.to_string(),
            dst: header.dst_addr.to_string(),
            protocol: header.protocol,
            ttl: header.ttl,
            total_length: header.total_length,
            header_len: header.header_len,
            options_len: header.options_len,
            fragment_offset: header.fragment_offset,
        }
    }
}

impl From<&TcpHeader<'_>> for TcpRecord {
    fn from(header: &TcpHeader<'_>) -> Self {
        Self {
            src_port: header.src_port,
            dst_port: header.dst_port,
            seq_number: header.seq_number,
            ack_number: header.ack_number,
            flags: header.flags.to_string(),
            window_size: header.window_size,
            header_len: header.header_len,
            options_len: header.options_len,
            options: header.parsed_options.clone(),
        }
    }
}

impl From<&UdpHeader> for UdpRecord {
    fn from(header: &UdpHeader) -> Self {
        Self {
            src_port: header.src_port,
            dst_port: header.dst_port,
            length: header.length,
        }
    }
}

pub(crate) fn build_frame_record(
    index: u64,
    timestamp: Option<String>,
    len: usize,
    dissection: &Dissection<'_>,
    error: Option<&DecodeError>,
) -> FrameRecord {
    let (tcp, udp) = match &dissection.transport {
        Some(Transport::Tcp(header)) => (Some(TcpRecord::from(header)), None),
        Some(Transport::Udp(header)) => (None, Some(UdpRecord::from(header))),
        None => (None, None),
    };
    FrameRecord {
        index,
        timestamp,
        len,
        ethernet: dissection.ethernet.as_ref().map(EthernetRecord::from),
        ipv4: dissection.ipv4.as_ref().map(Ipv4Record::from),
        tcp,
        udp,
        error: error.map(|err| FrameError {
            id: err.id().to_string(),
            message: err.to_string(),
        }),
    }
}

/// Running per-layer counters for a capture.
#[derive(Debug, Default)]
pub(crate) struct FrameCounters {
    pub frames_total: u64,
    pub ethernet_frames: u64,
    pub ipv4_packets: u64,
    pub tcp_segments: u64,
    pub udp_datagrams: u64,
    pub unsupported_frames: u64,
    pub failed_frames: u64,
}

impl FrameCounters {
    pub fn add(&mut self, supported: bool, dissection: &Dissection<'_>, failed: bool) {
        self.frames_total += 1;
        if !supported {
            self.unsupported_frames += 1;
            return;
        }
        if dissection.ethernet.is_some() {
            self.ethernet_frames += 1;
        }
        if dissection.ipv4.is_some() {
            self.ipv4_packets += 1;
        }
        match dissection.transport {
            Some(Transport::Tcp(_)) => self.tcp_segments += 1,
            Some(Transport::Udp(_)) => self.udp_datagrams += 1,
            None => {}
        }
        if failed {
            self.failed_frames += 1;
        }
    }

    pub fn into_summary(
        self,
        time_start: Option<String>,
        time_end: Option<String>,
    ) -> CaptureSummary {
        CaptureSummary {
            frames_total: self.frames_total,
            ethernet_frames: self.ethernet_frames,
            ipv4_packets: self.ipv4_packets,
            tcp_segments: self.tcp_segments,
            udp_datagrams: self.udp_datagrams,
            unsupported_frames: self.unsupported_frames,
            failed_frames: self.failed_frames,
            time_start,
            time_end,
        }
    }
}

#[derive(Debug, Default)]
struct ErrorStats {
    count: u64,
    examples: Vec<u64>,
}

/// Error occurrences keyed by stable identifier.
#[derive(Debug, Default)]
pub(crate) struct ErrorTally {
    by_id: BTreeMap<&'static str, ErrorStats>,
}

impl ErrorTally {
    pub fn add(&mut self, error: &DecodeError, index: u64) {
        let entry = self.by_id.entry(error.id()).or_default();
        entry.count += 1;
        if entry.examples.len() < MAX_ERROR_EXAMPLES {
            entry.examples.push(index);
        }
    }

    pub fn into_summaries(self) -> Vec<ErrorSummary> {
        self.by_id
            .into_iter()
            .map(|(id, stats)| ErrorSummary {
                id: id.to_string(),
                count: stats.count,
                examples: stats.examples,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorTally, FrameCounters, build_frame_record};
    use crate::analysis::dissect::{DecodeError, Dissection, Transport};
    use crate::protocols::ethernet::EthernetHeader;
    use crate::protocols::tcp::TcpError;
    use crate::protocols::udp::{UdpError, UdpHeader};

    #[test]
    fn error_tally_sorts_and_caps_examples() {
        let mut tally = ErrorTally::default();
        let tcp = DecodeError::Tcp(TcpError::InvalidDataOffset { data_offset: 2 });
        let udp = DecodeError::Udp(UdpError::ShortPacket {
            needed: 8,
            actual: 1,
        });
        for index in 0..5 {
            tally.add(&udp, index);
        }
        tally.add(&tcp, 9);

        let summaries = tally.into_summaries();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id, "WD-TCP-INVALID-OFFSET");
        assert_eq!(summaries[1].id, "WD-UDP-SHORT-PACKET");
        assert_eq!(summaries[1].count, 5);
        assert_eq!(summaries[1].examples, vec![0, 1, 2]);
    }

    #[test]
    fn frame_record_formats_layers() {
        let dissection = Dissection {
            ethernet: Some(EthernetHeader {
                dst_mac: 0xffff_ffff_ffff,
                src_mac: 0x0011_2233_4455,
                ether_type: 0x0800,
            }),
            ipv4: None,
            transport: Some(Transport::Udp(UdpHeader {
                src_port: 1,
                dst_port: 2,
                length: 8,
                checksum: 0,
            })),
        };
        let record = build_frame_record(4, None, 42, &dissection, None);
        let ethernet = record.ethernet.unwrap();
        assert_eq!(ethernet.src, "00:11:22:33:44:55");
        assert_eq!(ethernet.dst, "ff:ff:ff:ff:ff:ff");
        assert_eq!(record.udp.unwrap().dst_port, 2);
        assert!(record.tcp.is_none());
        assert!(record.error.is_none());
    }

    #[test]
    fn counters_track_layers() {
        let mut counters = FrameCounters::default();
        counters.add(false, &Dissection::default(), false);
        counters.add(true, &Dissection::default(), true);
        let summary = counters.into_summary(None, None);
        assert_eq!(summary.frames_total, 2);
        assert_eq!(summary.unsupported_frames, 1);
        assert_eq!(summary.failed_frames, 1);
        assert_eq!(summary.ipv4_packets, 0);
    }
}
