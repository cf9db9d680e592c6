use pcap_parser::Linktype;
use serde::Serialize;
use thiserror::Error;

use crate::DecodeConfig;
use crate::protocols::ethernet::{
    EthernetError, EthernetHeader, ethernet_payload, parse_ethernet_header,
};
use crate::protocols::ipv4::{
    Ipv4Error, Ipv4Header, ipv4_payload, layout as ipv4_layout, parse_ipv4_header,
};
use crate::protocols::tcp::{TcpError, TcpHeader, parse_tcp_header_with};
use crate::protocols::udp::{UdpError, UdpHeader, parse_udp_header};

/// Failure of one decoder while chaining through a frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Ethernet(#[from] EthernetError),
    #[error(transparent)]
    Ipv4(#[from] Ipv4Error),
    #[error(transparent)]
    Udp(#[from] UdpError),
    #[error(transparent)]
    Tcp(#[from] TcpError),
}

impl DecodeError {
    /// Stable identifier used to aggregate errors in reports.
    pub fn id(&self) -> &'static str {
        match self {
            DecodeError::Ethernet(EthernetError::ShortFrame { .. }) => "WD-ETH-SHORT-FRAME",
            DecodeError::Ipv4(Ipv4Error::TruncatedHeader { .. }) => "WD-IPV4-TRUNCATED-HEADER",
            DecodeError::Ipv4(Ipv4Error::InvalidHeaderLength { .. }) => "WD-IPV4-INVALID-IHL",
            DecodeError::Udp(UdpError::ShortPacket { .. }) => "WD-UDP-SHORT-PACKET",
            DecodeError::Tcp(TcpError::ShortPacket { .. }) => "WD-TCP-SHORT-PACKET",
            DecodeError::Tcp(TcpError::InvalidDataOffset { .. }) => "WD-TCP-INVALID-OFFSET",
            DecodeError::Tcp(TcpError::MalformedOption { .. }) => "WD-TCP-MALFORMED-OPTION",
        }
    }
}

/// Transport header selected by the IPv4 protocol number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "protocol", rename_all = "lowercase")]
pub enum Transport<'a> {
    Tcp(TcpHeader<'a>),
    Udp(UdpHeader),
}

/// Headers decoded from one frame, outermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dissection<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ethernet: Option<EthernetHeader>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<Ipv4Header<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<Transport<'a>>,
}

/// Chain Ethernet, IPv4 and TCP/UDP decoding over a captured frame.
///
/// Returns `Ok(None)` for link types other than Ethernet and raw IP. Decoding
/// stops quietly at the first layer with no decoder (non-IPv4 EtherType,
/// non-first fragment, other IP protocols); the first decoder failure is
/// returned as an error.
///
/// # Examples
/// ```
/// use pcap_parser::Linktype;
/// use wiredecode_core::{DecodeConfig, Transport, dissect_frame};
///
/// let mut packet = vec![0u8; 28];
/// packet[0] = 0x45;
/// packet[9] = 17;
/// packet[20..22].copy_from_slice(&53u16.to_be_bytes());
///
/// let dissection = dissect_frame(Linktype::RAW, &packet, &DecodeConfig::default())?
///     .expect("raw IP is supported");
/// assert!(matches!(dissection.transport, Some(Transport::Udp(udp)) if udp.src_port == 53));
/// # Ok::<(), wiredecode_core::DecodeError>(())
/// ```
pub fn dissect_frame<'a>(
    linktype: Linktype,
    data: &'a [u8],
    config: &DecodeConfig,
) -> Result<Option<Dissection<'a>>, DecodeError> {
    let mut dissection = Dissection::default();
    if !dissect_into(linktype, data, config, &mut dissection)? {
        return Ok(None);
    }
    Ok(Some(dissection))
}

/// Fill `out` layer by layer, leaving already decoded layers in place when a
/// later decoder fails. Returns `false` for unsupported link types.
pub(crate) fn dissect_into<'a>(
    linktype: Linktype,
    data: &'a [u8],
    config: &DecodeConfig,
    out: &mut Dissection<'a>,
) -> Result<bool, DecodeError> {
    let network = match linktype {
        Linktype::ETHERNET => {
            let ethernet = parse_ethernet_header(data)?;
            out.ethernet = Some(ethernet);
            if !ethernet.is_ipv4() {
                return Ok(true);
            }
            ethernet_payload(data)?
        }
        Linktype::RAW => {
            let version = data.first().map(|byte| byte >> 4);
            if version.is_some_and(|version| version != ipv4_layout::VERSION_4) {
                return Ok(true);
            }
            data
        }
        _ => return Ok(false),
    };

    let ipv4 = parse_ipv4_header(network)?;
    let payload = ipv4_payload(network, &ipv4);
    let protocol = ipv4.protocol;
    let trailing_fragment = ipv4.is_trailing_fragment();
    out.ipv4 = Some(ipv4);
    if trailing_fragment {
        return Ok(true);
    }

    out.transport = match protocol {
        ipv4_layout::PROTOCOL_TCP => {
            Some(Transport::Tcp(parse_tcp_header_with(payload, &config.tcp)?))
        }
        ipv4_layout::PROTOCOL_UDP => Some(Transport::Udp(parse_udp_header(payload)?)),
        _ => None,
    };
    Ok(true)
}
