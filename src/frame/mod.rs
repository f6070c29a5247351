//! HTTP/2 frame types and parsing.
//!
//! HTTP/2 frames have a common 9-byte header:
//! ```text
//! +-----------------------------------------------+
//! |                 Length (24)                   |
//! +---------------+---------------+---------------+
//! |   Type (8)    |   Flags (8)   |
//! +-+-------------+---------------+-------------------------------+
//! |R|                 Stream Identifier (31)                      |
//! +=+=============================================================+
//! |                   Frame Payload (0...)                      ...
//! +---------------------------------------------------------------+
//! ```
//!
//! The reserved bit `R` is ignored on read and written as zero.

mod decode;
mod encode;
mod error;
mod types;

pub use decode::FrameDecoder;
pub use encode::FrameEncoder;
pub use error::{ErrorCode, FrameError};
pub use types::*;

/// Maximum frame size allowed by HTTP/2 spec (2^24 - 1).
pub const MAX_FRAME_SIZE: u32 = 16_777_215;

/// Default maximum frame size (16 KB).
pub const DEFAULT_MAX_FRAME_SIZE: u32 = 16_384;

/// Frame header size in bytes.
pub const FRAME_HEADER_SIZE: usize = 9;
