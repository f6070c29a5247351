//! HTTP/2 frame encoding.
//!
//! Each typed frame serializes itself with `encode_into`; [`FrameEncoder`]
//! is the dispatching entry point. All paths derive the 24-bit length
//! field from the payload being written, so a serialized frame's declared
//! and actual payload lengths cannot disagree.

use bytes::{BufMut, BytesMut};

use super::types::*;
use super::FRAME_HEADER_SIZE;

/// Frame encoder that writes HTTP/2 frames to a byte buffer.
pub struct FrameEncoder {
    max_frame_size: u32,
}

impl Default for FrameEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameEncoder {
    /// Create a new frame encoder with default settings.
    pub fn new() -> Self {
        Self {
            max_frame_size: super::DEFAULT_MAX_FRAME_SIZE,
        }
    }

    /// Set the maximum frame size.
    pub fn set_max_frame_size(&mut self, size: u32) {
        self.max_frame_size = size;
    }

    /// Get the maximum frame size.
    pub fn max_frame_size(&self) -> u32 {
        self.max_frame_size
    }

    /// Encode a frame to the buffer.
    pub fn encode(&self, frame: &Frame, buf: &mut BytesMut) {
        match frame {
            Frame::Data(f) => f.encode_into(buf),
            Frame::Headers(f) => f.encode_into(buf),
            Frame::Priority(f) => f.encode_into(buf),
            Frame::RstStream(f) => f.encode_into(buf),
            Frame::Settings(f) => f.encode_into(buf),
            Frame::PushPromise(f) => f.encode_into(buf),
            Frame::Ping(f) => f.encode_into(buf),
            Frame::GoAway(f) => f.encode_into(buf),
            Frame::WindowUpdate(f) => f.encode_into(buf),
            Frame::Continuation(f) => f.encode_into(buf),
            Frame::Unknown(f) => f.encode_into(buf),
        }
    }
}

/// Helper functions for encoding specific frames directly.
impl FrameEncoder {
    /// Encode a SETTINGS ACK frame.
    pub fn encode_settings_ack(&self, buf: &mut BytesMut) {
        SettingsFrame::ack().encode_into(buf);
    }

    /// Encode a PING response (ACK).
    pub fn encode_ping_ack(&self, data: [u8; 8], buf: &mut BytesMut) {
        PingFrame { ack: true, data }.encode_into(buf);
    }

    /// Encode a WINDOW_UPDATE frame directly.
    pub fn write_window_update(&self, stream_id: StreamId, increment: u32, buf: &mut BytesMut) {
        WindowUpdateFrame {
            stream_id,
            increment,
        }
        .encode_into(buf);
    }

    /// Encode a RST_STREAM frame directly.
    pub fn write_rst_stream(&self, stream_id: StreamId, error_code: u32, buf: &mut BytesMut) {
        RstStreamFrame {
            stream_id,
            error_code,
        }
        .encode_into(buf);
    }

    /// Encode a GOAWAY frame directly.
    pub fn write_goaway(
        &self,
        last_stream_id: StreamId,
        error_code: u32,
        debug_data: &[u8],
        buf: &mut BytesMut,
    ) {
        GoAwayFrame {
            last_stream_id,
            error_code,
            debug_data: bytes::Bytes::copy_from_slice(debug_data),
        }
        .encode_into(buf);
    }
}

/// Reserve room and write the 9-byte header.
#[inline]
fn put_header(
    buf: &mut BytesMut,
    frame_type: FrameType,
    flags: u8,
    stream_id: StreamId,
    length: u32,
) {
    buf.reserve(FRAME_HEADER_SIZE + length as usize);
    buf.extend_from_slice(&FrameHeader::new(frame_type, flags, stream_id, length).build());
}

/// Write the 5-byte priority fields.
fn put_priority(buf: &mut BytesMut, priority: &Priority) {
    let mut dep = priority.dependency.value();
    if priority.exclusive {
        dep |= 0x8000_0000;
    }
    buf.put_u32(dep);
    buf.put_u8(priority.weight);
}

impl DataFrame {
    /// Serialize this frame to the buffer.
    pub fn encode_into(&self, buf: &mut BytesMut) {
        let mut frame_flags = 0u8;
        if self.end_stream {
            frame_flags |= flags::END_STREAM;
        }

        put_header(
            buf,
            FrameType::Data,
            frame_flags,
            self.stream_id,
            self.data.len() as u32,
        );
        buf.extend_from_slice(&self.data);
    }
}

impl HeadersFrame {
    /// Serialize this frame to the buffer.
    pub fn encode_into(&self, buf: &mut BytesMut) {
        let mut frame_flags = 0u8;
        if self.end_stream {
            frame_flags |= flags::END_STREAM;
        }
        if self.end_headers {
            frame_flags |= flags::END_HEADERS;
        }
        if self.priority.is_some() {
            frame_flags |= flags::PRIORITY;
        }

        let priority_len = if self.priority.is_some() { 5 } else { 0 };
        let length = priority_len + self.header_block.len() as u32;

        put_header(buf, FrameType::Headers, frame_flags, self.stream_id, length);

        if let Some(priority) = &self.priority {
            put_priority(buf, priority);
        }

        buf.extend_from_slice(&self.header_block);
    }
}

impl PriorityFrame {
    /// Serialize this frame to the buffer.
    pub fn encode_into(&self, buf: &mut BytesMut) {
        put_header(buf, FrameType::Priority, 0, self.stream_id, 5);
        put_priority(buf, &self.priority);
    }
}

impl RstStreamFrame {
    /// Serialize this frame to the buffer.
    pub fn encode_into(&self, buf: &mut BytesMut) {
        put_header(buf, FrameType::RstStream, 0, self.stream_id, 4);
        buf.put_u32(self.error_code);
    }
}

impl SettingsFrame {
    /// Serialize this frame to the buffer.
    ///
    /// Each parameter is a 6-byte `[identifier:16][value:32]` entry; an
    /// ACK frame always serializes with an empty payload.
    pub fn encode_into(&self, buf: &mut BytesMut) {
        let frame_flags = if self.ack { flags::ACK } else { 0 };
        let length = if self.ack {
            0
        } else {
            (self.settings.len() * 6) as u32
        };

        put_header(
            buf,
            FrameType::Settings,
            frame_flags,
            StreamId::CONNECTION,
            length,
        );

        if !self.ack {
            for setting in &self.settings {
                buf.put_u16(setting.id.to_u16());
                buf.put_u32(setting.value);
            }
        }
    }
}

impl PushPromiseFrame {
    /// Serialize this frame to the buffer.
    pub fn encode_into(&self, buf: &mut BytesMut) {
        let mut frame_flags = 0u8;
        if self.end_headers {
            frame_flags |= flags::END_HEADERS;
        }

        let length = 4 + self.header_block.len() as u32;

        put_header(
            buf,
            FrameType::PushPromise,
            frame_flags,
            self.stream_id,
            length,
        );

        buf.put_u32(self.promised_stream_id.value() & 0x7FFF_FFFF);
        buf.extend_from_slice(&self.header_block);
    }
}

impl PingFrame {
    /// Serialize this frame to the buffer.
    pub fn encode_into(&self, buf: &mut BytesMut) {
        let frame_flags = if self.ack { flags::ACK } else { 0 };

        put_header(buf, FrameType::Ping, frame_flags, StreamId::CONNECTION, 8);
        buf.extend_from_slice(&self.data);
    }
}

impl GoAwayFrame {
    /// Serialize this frame to the buffer.
    pub fn encode_into(&self, buf: &mut BytesMut) {
        let length = 8 + self.debug_data.len() as u32;

        put_header(buf, FrameType::GoAway, 0, StreamId::CONNECTION, length);

        buf.put_u32(self.last_stream_id.value() & 0x7FFF_FFFF);
        buf.put_u32(self.error_code);
        buf.extend_from_slice(&self.debug_data);
    }
}

impl WindowUpdateFrame {
    /// Serialize this frame to the buffer.
    pub fn encode_into(&self, buf: &mut BytesMut) {
        put_header(buf, FrameType::WindowUpdate, 0, self.stream_id, 4);
        buf.put_u32(self.increment & 0x7FFF_FFFF);
    }
}

impl ContinuationFrame {
    /// Serialize this frame to the buffer.
    pub fn encode_into(&self, buf: &mut BytesMut) {
        let mut frame_flags = 0u8;
        if self.end_headers {
            frame_flags |= flags::END_HEADERS;
        }

        put_header(
            buf,
            FrameType::Continuation,
            frame_flags,
            self.stream_id,
            self.header_block.len() as u32,
        );

        buf.extend_from_slice(&self.header_block);
    }
}

impl UnknownFrame {
    /// Serialize this frame to the buffer, carrying the opaque type byte
    /// and flags through unchanged.
    pub fn encode_into(&self, buf: &mut BytesMut) {
        let length = self.payload.len() as u32;
        buf.reserve(FRAME_HEADER_SIZE + length as usize);

        let header = FrameHeader {
            length,
            frame_type: self.frame_type,
            flags: self.flags,
            stream_id: self.stream_id,
        };
        buf.extend_from_slice(&header.build());
        buf.extend_from_slice(&self.payload);
    }
}
