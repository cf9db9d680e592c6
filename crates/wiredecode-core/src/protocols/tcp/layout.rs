pub const SRC_PORT_RANGE: std::ops::Range<usize> = 0..2;
pub const DST_PORT_RANGE: std::ops::Range<usize> = 2..4;
pub const SEQ_NUMBER_RANGE: std::ops::Range<usize> = 4..8;
pub const ACK_NUMBER_RANGE: std::ops::Range<usize> = 8..12;
pub const DATA_OFFSET_OFFSET: usize = 12;
pub const FLAGS_OFFSET: usize = 13;
pub const WINDOW_SIZE_RANGE: std::ops::Range<usize> = 14..16;
pub const CHECKSUM_RANGE: std::ops::Range<usize> = 16..18;
pub const URGENT_POINTER_RANGE: std::ops::Range<usize> = 18..20;
pub const OPTIONS_OFFSET: usize = 20;

pub const MIN_HEADER_LEN: usize = 20;
pub const MIN_DATA_OFFSET: u8 = 5;
pub const WORD_LEN: usize = 4;

// Byte 12: data offset (4 bits), reserved (3 bits), NS (1 bit).
pub const DATA_OFFSET_SHIFT: u32 = 4;
pub const RESERVED_SHIFT: u32 = 1;
pub const NS_BIT: u32 = 0;

// Byte 13, most significant bit first.
pub const CWR_BIT: u32 = 7;
pub const ECE_BIT: u32 = 6;
pub const URG_BIT: u32 = 5;
pub const ACK_BIT: u32 = 4;
pub const PSH_BIT: u32 = 3;
pub const RST_BIT: u32 = 2;
pub const SYN_BIT: u32 = 1;
pub const FIN_BIT: u32 = 0;

pub const OPTION_END_OF_LIST: u8 = 0;
pub const OPTION_NOP: u8 = 1;
pub const OPTION_MSS: u8 = 2;
pub const OPTION_WINDOW_SCALE: u8 = 3;
pub const OPTION_SACK_PERMITTED: u8 = 4;
pub const OPTION_SACK: u8 = 5;
pub const OPTION_TIMESTAMPS: u8 = 8;

/// Kind byte plus declared length byte.
pub const OPTION_HEADER_LEN: usize = 2;
pub const MSS_LEN: u8 = 4;
pub const WINDOW_SCALE_LEN: u8 = 3;
pub const SACK_PERMITTED_LEN: u8 = 2;
pub const TIMESTAMPS_LEN: u8 = 10;
pub const SACK_EDGE_LEN: usize = 4;
pub const SACK_BLOCK_LEN: usize = 2 * SACK_EDGE_LEN;
