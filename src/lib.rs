//! h2codec - HTTP/2 frame and HPACK codec.
//!
//! This crate implements the two wire-format layers of HTTP/2: the 9-byte
//! frame header with its typed payloads, and HPACK header compression.
//! It owns no sockets and spawns nothing: a connection manager reads frame
//! bytes off its transport and hands them here, and gets structured frames
//! and header lists back (and the inverse on the write path).
//!
//! # Scope
//!
//! Stream multiplexing, flow-control accounting, TLS/ALPN, and the
//! connection-preface handshake are the surrounding connection manager's
//! job. The codec is synchronous and never blocks; every failure is a
//! `Result` error, and HPACK failures are connection-fatal because the
//! compression state they corrupt is shared with the peer.
//!
//! # Architecture
//!
//! - `frame`: HTTP/2 frame types, encoding, and decoding
//! - `hpack`: HPACK header compression
//!
//! Frame encode/decode carries no shared state and is reentrant across
//! connections. Each `HpackEncoder`/`HpackDecoder` owns the dynamic table
//! for one direction of one connection and expects externally serialized,
//! in-order use.

pub mod frame;
pub mod hpack;

// Re-export commonly used types
pub use frame::{
    ContinuationFrame, DEFAULT_MAX_FRAME_SIZE, DataFrame, ErrorCode, FRAME_HEADER_SIZE, Frame,
    FrameDecoder, FrameEncoder, FrameError, FrameHeader, FrameType, GoAwayFrame, HeadersFrame,
    MAX_FRAME_SIZE, PingFrame, Priority, PriorityFrame, PushPromiseFrame, RstStreamFrame, Setting,
    SettingId, SettingsFrame, StreamId, UnknownFrame, WindowUpdateFrame,
};

pub use hpack::{DEFAULT_TABLE_SIZE, HeaderField, HpackDecoder, HpackEncoder, HpackError};
