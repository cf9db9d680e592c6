pub const VERSION_IHL_OFFSET: usize = 0;
pub const DSCP_ECN_OFFSET: usize = 1;
pub const TOTAL_LENGTH_RANGE: std::ops::Range<usize> = 2..4;
pub const IDENTIFICATION_RANGE: std::ops::Range<usize> = 4..6;
pub const FLAGS_FRAGMENT_RANGE: std::ops::Range<usize> = 6..8;
pub const TTL_OFFSET: usize = 8;
pub const PROTOCOL_OFFSET: usize = 9;
pub const CHECKSUM_RANGE: std::ops::Range<usize> = 10..12;
pub const SRC_ADDR_RANGE: std::ops::Range<usize> = 12..16;
pub const DST_ADDR_RANGE: std::ops::Range<usize> = 16..20;
pub const OPTIONS_OFFSET: usize = 20;

pub const MIN_HEADER_LEN: usize = 20;
pub const MIN_IHL: u8 = 5;
pub const WORD_LEN: usize = 4;

pub const VERSION_SHIFT: u32 = 4;
pub const DSCP_SHIFT: u32 = 2;
pub const FLAGS_SHIFT: u32 = 13;
pub const FRAGMENT_OFFSET_MASK: u16 = 0x1fff;

pub const FLAG_DONT_FRAGMENT: u8 = 0b010;
pub const FLAG_MORE_FRAGMENTS: u8 = 0b001;

pub const VERSION_4: u8 = 4;

pub const PROTOCOL_ICMP: u8 = 1;
pub const PROTOCOL_TCP: u8 = 6;
pub const PROTOCOL_UDP: u8 = 17;
