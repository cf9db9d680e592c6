/// Section header block type, which doubles as the PCAPNG file magic.
pub const PCAPNG_MAGIC: [u8; 4] = [0x0a, 0x0d, 0x0d, 0x0a];

pub const READER_BUFFER_SIZE: usize = 65536;

pub const SECONDS_PER_MICRO: f64 = 1e-6;
pub const SECONDS_PER_NANO: f64 = 1e-9;
