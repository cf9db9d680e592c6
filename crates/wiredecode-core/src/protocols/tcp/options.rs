//! TCP options walker.
//!
//! The walker is table driven: each supported kind maps to a length rule and
//! a decode function over the option payload (the bytes after kind and
//! length). Length rules are checked before the payload is sliced, so a
//! decode function only ever sees a payload of the size its rule admits.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::config::UnknownOptionPolicy;
use super::error::{OptionFault, TcpError};
use super::layout;
use crate::protocols::common::reader::assemble_be;

/// Option fields decoded from one header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TcpOptions {
    pub nop_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mss: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_scale: Option<u8>,
    pub sack_permitted: bool,
    /// SACK block edges, flattened: left, right, left, right, ...
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sack: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<TcpTimestamp>,
    /// Unknown kinds passed over under `UnknownOptionPolicy::Skip`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_kinds: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TcpTimestamp {
    pub value: u32,
    pub echo: u32,
}

impl TcpOptions {
    /// SACK blocks as `(left, right)` edge pairs.
    pub fn sack_blocks(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.sack.chunks_exact(2).map(|edges| (edges[0], edges[1]))
    }
}

enum LengthRule {
    Exact(u8),
    /// Two header bytes followed by whole 8-byte blocks.
    SackBlocks,
}

impl LengthRule {
    fn check(&self, declared: u8) -> Result<(), OptionFault> {
        match *self {
            LengthRule::Exact(expected) if declared != expected => {
                Err(OptionFault::LengthMismatch { expected, declared })
            }
            LengthRule::Exact(_) => Ok(()),
            LengthRule::SackBlocks => {
                let declared_len = usize::from(declared);
                if declared_len < layout::OPTION_HEADER_LEN {
                    Err(OptionFault::LengthTooShort { declared })
                } else if (declared_len - layout::OPTION_HEADER_LEN) % layout::SACK_BLOCK_LEN != 0 {
                    Err(OptionFault::SackLength { declared })
                } else {
                    Ok(())
                }
            }
        }
    }
}

struct OptionHandler {
    kind: u8,
    length: LengthRule,
    decode: fn(&mut TcpOptions, &[u8]),
}

const HANDLER_COUNT: usize = 5;

static OPTION_HANDLERS: [OptionHandler; HANDLER_COUNT] = [
    OptionHandler {
        kind: layout::OPTION_MSS,
        length: LengthRule::Exact(layout::MSS_LEN),
        decode: decode_mss,
    },
    OptionHandler {
        kind: layout::OPTION_WINDOW_SCALE,
        length: LengthRule::Exact(layout::WINDOW_SCALE_LEN),
        decode: decode_window_scale,
    },
    OptionHandler {
        kind: layout::OPTION_SACK_PERMITTED,
        length: LengthRule::Exact(layout::SACK_PERMITTED_LEN),
        decode: decode_sack_permitted,
    },
    OptionHandler {
        kind: layout::OPTION_SACK,
        length: LengthRule::SackBlocks,
        decode: decode_sack,
    },
    OptionHandler {
        kind: layout::OPTION_TIMESTAMPS,
        length: LengthRule::Exact(layout::TIMESTAMPS_LEN),
        decode: decode_timestamps,
    },
];

fn handler_for(kind: u8) -> Option<(usize, &'static OptionHandler)> {
    OPTION_HANDLERS
        .iter()
        .enumerate()
        .find(|(_, handler)| handler.kind == kind)
}

fn decode_mss(options: &mut TcpOptions, payload: &[u8]) {
    options.mss = Some(assemble_be(payload) as u16);
}

fn decode_window_scale(options: &mut TcpOptions, payload: &[u8]) {
    options.window_scale = Some(assemble_be(payload) as u8);
}

fn decode_sack_permitted(options: &mut TcpOptions, _payload: &[u8]) {
    options.sack_permitted = true;
}

fn decode_sack(options: &mut TcpOptions, payload: &[u8]) {
    options.sack = payload
        .chunks_exact(layout::SACK_EDGE_LEN)
        .map(|edge| assemble_be(edge) as u32)
        .collect();
}

fn decode_timestamps(options: &mut TcpOptions, payload: &[u8]) {
    let (value, echo) = payload.split_at(payload.len() / 2);
    options.timestamp = Some(TcpTimestamp {
        value: assemble_be(value) as u32,
        echo: assemble_be(echo) as u32,
    });
}

/// Walk the options `region` of a header whose options start at `base`.
///
/// The region must already be bounded by the header length; the walk never
/// looks past its end.
pub(crate) fn walk_options(
    region: &[u8],
    base: usize,
    policy: UnknownOptionPolicy,
) -> Result<TcpOptions, TcpError> {
    let mut options = TcpOptions::default();
    let mut seen = [false; HANDLER_COUNT];
    let mut cursor = 0usize;

    while let Some(&kind) = region.get(cursor) {
        let offset = base + cursor;
        let malformed = move |fault| TcpError::MalformedOption {
            kind,
            offset,
            fault,
        };

        match kind {
            layout::OPTION_END_OF_LIST => {
                trace!(offset, "end of TCP option list");
                break;
            }
            layout::OPTION_NOP => {
                options.nop_count += 1;
                cursor += 1;
                continue;
            }
            _ => {}
        }

        let available = region.len() - cursor;
        let declared = region.get(cursor + 1).copied().ok_or_else(|| {
            malformed(OptionFault::Truncated {
                needed: layout::OPTION_HEADER_LEN,
                available,
            })
        })?;

        let handler = handler_for(kind);
        match handler {
            Some((_, handler)) => handler.length.check(declared).map_err(malformed)?,
            None if policy == UnknownOptionPolicy::Reject => {
                debug!(kind, offset, "rejecting unknown TCP option");
                return Err(malformed(OptionFault::UnknownKind));
            }
            None if usize::from(declared) < layout::OPTION_HEADER_LEN => {
                return Err(malformed(OptionFault::LengthTooShort { declared }));
            }
            None => {}
        }

        let end = cursor + usize::from(declared);
        let payload = region
            .get(cursor + layout::OPTION_HEADER_LEN..end)
            .ok_or_else(|| {
                malformed(OptionFault::Truncated {
                    needed: usize::from(declared),
                    available,
                })
            })?;

        match handler {
            Some((slot, handler)) => {
                if seen[slot] {
                    return Err(malformed(OptionFault::Duplicate));
                }
                seen[slot] = true;
                (handler.decode)(&mut options, payload);
                trace!(kind, offset, len = declared, "decoded TCP option");
            }
            None => {
                debug!(kind, offset, len = declared, "skipping unknown TCP option");
                options.skipped_kinds.push(kind);
            }
        }
        cursor = end;
    }

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::{TcpOptions, TcpTimestamp, walk_options};
    use crate::protocols::tcp::config::UnknownOptionPolicy;
    use crate::protocols::tcp::error::{OptionFault, TcpError};

    const BASE: usize = 20;

    fn walk(region: &[u8]) -> Result<TcpOptions, TcpError> {
        walk_options(region, BASE, UnknownOptionPolicy::Reject)
    }

    fn fault_of(result: Result<TcpOptions, TcpError>) -> (u8, usize, OptionFault) {
        match result {
            Err(TcpError::MalformedOption {
                kind,
                offset,
                fault,
            }) => (kind, offset, fault),
            other => panic!("expected malformed option, got {other:?}"),
        }
    }

    #[test]
    fn mss_then_nops_then_padding() {
        let options = walk(&[2, 4, 0x05, 0xb4, 1, 1, 0, 0, 0, 0, 0, 0]).unwrap();
        assert_eq!(options.mss, Some(1460));
        assert_eq!(options.nop_count, 2);
        assert!(options.sack.is_empty());
        assert_eq!(options.timestamp, None);
    }

    #[test]
    fn syn_option_set() {
        let region = [
            2, 4, 0x05, 0xb4, 4, 2, 8, 10, 0x00, 0x01, 0x02, 0x03, 0, 0, 0, 0, 1, 3, 3, 7,
        ];
        let options = walk(&region).unwrap();
        assert_eq!(options.mss, Some(1460));
        assert!(options.sack_permitted);
        assert_eq!(
            options.timestamp,
            Some(TcpTimestamp {
                value: 0x0001_0203,
                echo: 0
            })
        );
        assert_eq!(options.nop_count, 1);
        assert_eq!(options.window_scale, Some(7));
    }

    #[test]
    fn sack_single_block() {
        let region = [5, 10, 0, 0, 0x10, 0x00, 0, 0, 0x20, 0x00, 1, 1];
        let options = walk(&region).unwrap();
        assert_eq!(options.sack, vec![0x1000, 0x2000]);
        assert_eq!(
            options.sack_blocks().collect::<Vec<_>>(),
            vec![(0x1000, 0x2000)]
        );
    }

    #[test]
    fn sack_two_blocks_keep_order() {
        let mut region = vec![1, 1, 5, 18];
        for edge in [100u32, 200, 300, 400] {
            region.extend_from_slice(&edge.to_be_bytes());
        }
        let options = walk(&region).unwrap();
        assert_eq!(options.sack, vec![100, 200, 300, 400]);
        assert_eq!(options.sack_blocks().count(), 2);
    }

    #[test]
    fn sack_length_not_whole_blocks() {
        let region = [5, 11, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0];
        assert_eq!(
            fault_of(walk(&region)),
            (5, BASE, OptionFault::SackLength { declared: 11 })
        );
    }

    #[test]
    fn empty_sack_is_accepted() {
        let options = walk(&[5, 2, 0, 0]).unwrap();
        assert!(options.sack.is_empty());
    }

    #[test]
    fn mss_length_mismatch() {
        for declared in [0u8, 1, 2, 3, 5, 40, 255] {
            let region = [2, declared, 0x05, 0xb4, 0, 0, 0, 0];
            assert_eq!(
                fault_of(walk(&region)),
                (
                    2,
                    BASE,
                    OptionFault::LengthMismatch {
                        expected: 4,
                        declared
                    }
                )
            );
        }
    }

    #[test]
    fn window_scale_and_timestamp_mismatch() {
        assert_eq!(
            fault_of(walk(&[1, 3, 4, 7])),
            (
                3,
                BASE + 1,
                OptionFault::LengthMismatch {
                    expected: 3,
                    declared: 4
                }
            )
        );
        assert_eq!(
            fault_of(walk(&[8, 12, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0])),
            (
                8,
                BASE,
                OptionFault::LengthMismatch {
                    expected: 10,
                    declared: 12
                }
            )
        );
        assert_eq!(
            fault_of(walk(&[4, 3, 0, 0])),
            (
                4,
                BASE,
                OptionFault::LengthMismatch {
                    expected: 2,
                    declared: 3
                }
            )
        );
    }

    #[test]
    fn end_of_list_stops_walk() {
        let options = walk(&[1, 0, 2, 5, 0xff, 0xff, 0xff, 0xff]).unwrap();
        assert_eq!(options.nop_count, 1);
        assert_eq!(options.mss, None);
    }

    #[test]
    fn option_running_past_region() {
        assert_eq!(
            fault_of(walk(&[1, 1, 8, 10, 0, 0, 0, 1])),
            (
                8,
                BASE + 2,
                OptionFault::Truncated {
                    needed: 10,
                    available: 6
                }
            )
        );
    }

    #[test]
    fn missing_length_byte() {
        assert_eq!(
            fault_of(walk(&[1, 1, 1, 2])),
            (
                2,
                BASE + 3,
                OptionFault::Truncated {
                    needed: 2,
                    available: 1
                }
            )
        );
    }

    #[test]
    fn duplicate_option_rejected() {
        let region = [2, 4, 0x05, 0xb4, 2, 4, 0x02, 0x18];
        assert_eq!(
            fault_of(walk(&region)),
            (2, BASE + 4, OptionFault::Duplicate)
        );
    }

    #[test]
    fn unknown_kind_rejected_by_default() {
        let region = [30, 4, 0, 0];
        assert_eq!(
            fault_of(walk(&region)),
            (30, BASE, OptionFault::UnknownKind)
        );
    }

    #[test]
    fn unknown_kind_skipped_when_lenient() {
        let region = [30, 4, 0xaa, 0xbb, 2, 4, 0x05, 0xb4, 34, 2, 0, 0];
        let options = walk_options(&region, BASE, UnknownOptionPolicy::Skip).unwrap();
        assert_eq!(options.skipped_kinds, vec![30, 34]);
        assert_eq!(options.mss, Some(1460));
    }

    #[test]
    fn lenient_skip_still_checks_length() {
        let result = walk_options(&[30, 1, 0, 0], BASE, UnknownOptionPolicy::Skip);
        assert_eq!(
            fault_of(result),
            (30, BASE, OptionFault::LengthTooShort { declared: 1 })
        );

        let result = walk_options(&[30, 9, 0, 0], BASE, UnknownOptionPolicy::Skip);
        assert_eq!(
            fault_of(result),
            (
                30,
                BASE,
                OptionFault::Truncated {
                    needed: 9,
                    available: 4
                }
            )
        );
    }

    #[test]
    fn empty_region() {
        assert_eq!(walk(&[]).unwrap(), TcpOptions::default());
    }
}
