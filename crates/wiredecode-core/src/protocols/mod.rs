//! Header decoders.
//!
//! Each protocol follows a layered structure:
//! - `layout`: byte offsets, ranges and constants (source of truth)
//! - `reader`: bounds-checked byte access and bit-packing conventions
//! - `parser`: domain-level decoding (no direct byte indexing)
//! - `error`: explicit, actionable errors
//!
//! Decoders are pure functions over a borrowed buffer. They never chain into
//! each other; `analysis::dissect_frame` does that for callers who want it.

pub(crate) mod common;
pub mod ethernet;
pub mod ipv4;
pub mod tcp;
pub mod udp;
