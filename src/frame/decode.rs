//! HTTP/2 frame decoding.
//!
//! [`FrameDecoder`] splits raw bytes into header + payload and dispatches
//! on the type byte; the typed `parse` constructors on the frame structs
//! do the per-type validation and field extraction. Handing a header with
//! the wrong type byte to a typed constructor is an error, so a variant
//! can never be built from another variant's bytes.

use bytes::{Buf, Bytes, BytesMut};
use tracing::{debug, trace};

use super::error::FrameError;
use super::types::*;
use super::{DEFAULT_MAX_FRAME_SIZE, FRAME_HEADER_SIZE};

/// Frame decoder that parses HTTP/2 frames from raw bytes.
///
/// Stateless apart from the max-frame-size limit, so a single decoder is
/// safely reused across frames and connections.
pub struct FrameDecoder {
    max_frame_size: u32,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    /// Create a new frame decoder with default settings.
    pub fn new() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }

    /// Set the maximum frame size (SETTINGS_MAX_FRAME_SIZE).
    pub fn set_max_frame_size(&mut self, size: u32) {
        self.max_frame_size = size;
    }

    /// Try to decode a frame from the buffer.
    ///
    /// Returns `Ok(Some(frame))` if a complete frame was decoded,
    /// `Ok(None)` if more data is needed, or `Err` on protocol error.
    ///
    /// On success, the consumed bytes are removed from the buffer.
    pub fn decode(&self, buf: &mut BytesMut) -> Result<Option<Frame>, FrameError> {
        if buf.len() < FRAME_HEADER_SIZE {
            return Ok(None);
        }

        // Parse header without consuming
        let header = FrameHeader::parse(&buf[..FRAME_HEADER_SIZE])?;

        if header.length > self.max_frame_size {
            return Err(FrameError::FrameTooLarge {
                size: header.length,
                max: self.max_frame_size,
            });
        }

        let total_len = FRAME_HEADER_SIZE + header.length as usize;
        if buf.len() < total_len {
            return Ok(None);
        }

        buf.advance(FRAME_HEADER_SIZE);
        let payload = buf.split_to(header.length as usize).freeze();

        let frame = dispatch(header, payload)?;

        trace!(
            frame_type = header.frame_type,
            length = header.length,
            stream_id = header.stream_id.value(),
            "decoded frame"
        );

        Ok(Some(frame))
    }

    /// Decode a frame from separately supplied header and payload bytes.
    ///
    /// This is the path for callers that read the 9 header bytes and then
    /// `length` payload bytes off the transport themselves. Fails with
    /// [`FrameError::PayloadLengthMismatch`] when the payload does not
    /// match the header's declared length.
    pub fn decode_parts(&self, header_bytes: &[u8], payload: Bytes) -> Result<Frame, FrameError> {
        let header = FrameHeader::parse(header_bytes)?;

        if payload.len() != header.length as usize {
            return Err(FrameError::PayloadLengthMismatch {
                expected: header.length as usize,
                actual: payload.len(),
            });
        }

        if header.length > self.max_frame_size {
            return Err(FrameError::FrameTooLarge {
                size: header.length,
                max: self.max_frame_size,
            });
        }

        dispatch(header, payload)
    }
}

/// Route a header + payload to the typed constructor for its type byte.
fn dispatch(header: FrameHeader, payload: Bytes) -> Result<Frame, FrameError> {
    let frame = match FrameType::from_u8(header.frame_type) {
        Some(FrameType::Data) => Frame::Data(DataFrame::parse(header, payload)?),
        Some(FrameType::Headers) => Frame::Headers(HeadersFrame::parse(header, payload)?),
        Some(FrameType::Priority) => Frame::Priority(PriorityFrame::parse(header, payload)?),
        Some(FrameType::RstStream) => Frame::RstStream(RstStreamFrame::parse(header, payload)?),
        Some(FrameType::Settings) => Frame::Settings(SettingsFrame::parse(header, payload)?),
        Some(FrameType::PushPromise) => {
            Frame::PushPromise(PushPromiseFrame::parse(header, payload)?)
        }
        Some(FrameType::Ping) => Frame::Ping(PingFrame::parse(header, payload)?),
        Some(FrameType::GoAway) => Frame::GoAway(GoAwayFrame::parse(header, payload)?),
        Some(FrameType::WindowUpdate) => {
            Frame::WindowUpdate(WindowUpdateFrame::parse(header, payload)?)
        }
        Some(FrameType::Continuation) => {
            Frame::Continuation(ContinuationFrame::parse(header, payload)?)
        }
        None => Frame::Unknown(UnknownFrame {
            frame_type: header.frame_type,
            flags: header.flags,
            stream_id: header.stream_id,
            payload,
        }),
    };
    Ok(frame)
}

/// Fail unless the header's type byte matches the expected variant.
fn expect_type(header: &FrameHeader, expected: FrameType) -> Result<(), FrameError> {
    if header.frame_type != expected as u8 {
        return Err(FrameError::FrameTypeMismatch {
            expected: expected as u8,
            actual: header.frame_type,
        });
    }
    Ok(())
}

/// Fail unless the frame sits on a non-zero stream.
fn expect_stream(header: &FrameHeader) -> Result<(), FrameError> {
    if header.stream_id.is_connection_level() {
        return Err(FrameError::StreamIdRequired {
            frame_type: header.frame_type,
        });
    }
    Ok(())
}

/// Fail unless the frame sits on stream 0.
fn expect_connection_level(header: &FrameHeader) -> Result<(), FrameError> {
    if !header.stream_id.is_connection_level() {
        return Err(FrameError::InvalidStreamZero {
            frame_type: header.frame_type,
        });
    }
    Ok(())
}

/// Fail unless the payload is exactly `expected` bytes.
fn expect_len(header: &FrameHeader, payload: &Bytes, expected: usize) -> Result<(), FrameError> {
    if payload.len() != expected {
        return Err(FrameError::InvalidPayloadLength {
            frame_type: header.frame_type,
            expected,
            actual: payload.len(),
        });
    }
    Ok(())
}

/// Strip the pad-length byte and trailing padding from a PADDED payload.
fn strip_padding(header: &FrameHeader, mut payload: Bytes) -> Result<Bytes, FrameError> {
    if !header.has_flag(flags::PADDED) {
        return Ok(payload);
    }

    if payload.is_empty() {
        return Err(FrameError::InvalidPadding {
            pad_length: 0,
            payload_length: 0,
        });
    }

    let pad_length = payload.get_u8() as usize;

    // Padding length must not exceed remaining payload
    if pad_length >= payload.len() {
        return Err(FrameError::InvalidPadding {
            pad_length: pad_length as u8,
            payload_length: payload.len() + 1,
        });
    }

    Ok(payload.slice(..payload.len() - pad_length))
}

/// Read the 5-byte priority fields (exclusive bit, dependency, weight).
fn read_priority(payload: &mut Bytes) -> Priority {
    let first = payload.get_u32();
    Priority {
        exclusive: (first & 0x8000_0000) != 0,
        dependency: StreamId::new(first & 0x7FFF_FFFF),
        weight: payload.get_u8(),
    }
}

impl DataFrame {
    /// Parse a DATA frame from its header and payload.
    pub fn parse(header: FrameHeader, payload: Bytes) -> Result<Self, FrameError> {
        expect_type(&header, FrameType::Data)?;
        expect_stream(&header)?;

        let data = strip_padding(&header, payload)?;

        Ok(Self {
            stream_id: header.stream_id,
            end_stream: header.has_flag(flags::END_STREAM),
            data,
        })
    }
}

impl HeadersFrame {
    /// Parse a HEADERS frame from its header and payload.
    pub fn parse(header: FrameHeader, payload: Bytes) -> Result<Self, FrameError> {
        expect_type(&header, FrameType::Headers)?;
        expect_stream(&header)?;

        let mut payload = strip_padding(&header, payload)?;

        let priority = if header.has_flag(flags::PRIORITY) {
            if payload.len() < 5 {
                return Err(FrameError::InvalidPayloadLength {
                    frame_type: header.frame_type,
                    expected: 5,
                    actual: payload.len(),
                });
            }
            Some(read_priority(&mut payload))
        } else {
            None
        };

        Ok(Self {
            stream_id: header.stream_id,
            end_stream: header.has_flag(flags::END_STREAM),
            end_headers: header.has_flag(flags::END_HEADERS),
            priority,
            header_block: payload,
        })
    }
}

impl PriorityFrame {
    /// Parse a PRIORITY frame from its header and payload.
    pub fn parse(header: FrameHeader, mut payload: Bytes) -> Result<Self, FrameError> {
        expect_type(&header, FrameType::Priority)?;
        expect_stream(&header)?;
        expect_len(&header, &payload, 5)?;

        Ok(Self {
            stream_id: header.stream_id,
            priority: read_priority(&mut payload),
        })
    }
}

impl RstStreamFrame {
    /// Parse a RST_STREAM frame from its header and payload.
    pub fn parse(header: FrameHeader, mut payload: Bytes) -> Result<Self, FrameError> {
        expect_type(&header, FrameType::RstStream)?;
        expect_stream(&header)?;
        expect_len(&header, &payload, 4)?;

        Ok(Self {
            stream_id: header.stream_id,
            error_code: payload.get_u32(),
        })
    }
}

impl SettingsFrame {
    /// Parse a SETTINGS frame from its header and payload.
    ///
    /// The payload is walked in 6-byte `[identifier:16][value:32]`
    /// strides. Entries with an unrecognized identifier code are skipped,
    /// never an error: a peer may send settings from a future revision of
    /// the protocol.
    pub fn parse(header: FrameHeader, mut payload: Bytes) -> Result<Self, FrameError> {
        expect_type(&header, FrameType::Settings)?;
        expect_connection_level(&header)?;

        let ack = header.has_flag(flags::ACK);

        // ACK SETTINGS must have empty payload
        if ack && !payload.is_empty() {
            return Err(FrameError::InvalidPayloadLength {
                frame_type: header.frame_type,
                expected: 0,
                actual: payload.len(),
            });
        }

        // SETTINGS payload must be a multiple of 6 bytes
        if !payload.len().is_multiple_of(6) {
            return Err(FrameError::InvalidPayloadLength {
                frame_type: header.frame_type,
                expected: (payload.len() / 6) * 6,
                actual: payload.len(),
            });
        }

        let mut settings = Vec::with_capacity(payload.len() / 6);

        while payload.has_remaining() {
            let raw_id = payload.get_u16();
            let value = payload.get_u32();

            let Some(id) = SettingId::from_u16(raw_id) else {
                debug!(
                    identifier = raw_id,
                    value, "ignoring unknown settings parameter"
                );
                continue;
            };

            validate_setting(id, value)?;

            settings.push(Setting { id, value });
        }

        Ok(Self { ack, settings })
    }
}

/// Validate a setting value.
fn validate_setting(id: SettingId, value: u32) -> Result<(), FrameError> {
    match id {
        SettingId::EnablePush => {
            if value > 1 {
                return Err(FrameError::InvalidSettingValue {
                    id: id.to_u16(),
                    value,
                });
            }
        }
        SettingId::InitialWindowSize => {
            // Must not exceed 2^31 - 1
            if value > 0x7FFF_FFFF {
                return Err(FrameError::InvalidSettingValue {
                    id: id.to_u16(),
                    value,
                });
            }
        }
        SettingId::MaxFrameSize => {
            // Must be between 16384 and 16777215
            if !(16_384..=16_777_215).contains(&value) {
                return Err(FrameError::InvalidSettingValue {
                    id: id.to_u16(),
                    value,
                });
            }
        }
        _ => {}
    }
    Ok(())
}

impl PushPromiseFrame {
    /// Parse a PUSH_PROMISE frame from its header and payload.
    pub fn parse(header: FrameHeader, payload: Bytes) -> Result<Self, FrameError> {
        expect_type(&header, FrameType::PushPromise)?;
        expect_stream(&header)?;

        let mut payload = strip_padding(&header, payload)?;

        if payload.len() < 4 {
            return Err(FrameError::InvalidPayloadLength {
                frame_type: header.frame_type,
                expected: 4,
                actual: payload.len(),
            });
        }

        Ok(Self {
            stream_id: header.stream_id,
            end_headers: header.has_flag(flags::END_HEADERS),
            promised_stream_id: StreamId::new(payload.get_u32() & 0x7FFF_FFFF),
            header_block: payload,
        })
    }
}

impl PingFrame {
    /// Parse a PING frame from its header and payload.
    pub fn parse(header: FrameHeader, payload: Bytes) -> Result<Self, FrameError> {
        expect_type(&header, FrameType::Ping)?;
        expect_connection_level(&header)?;
        expect_len(&header, &payload, 8)?;

        let mut data = [0u8; 8];
        data.copy_from_slice(&payload[..8]);

        Ok(Self {
            ack: header.has_flag(flags::ACK),
            data,
        })
    }
}

impl GoAwayFrame {
    /// Parse a GOAWAY frame from its header and payload.
    pub fn parse(header: FrameHeader, mut payload: Bytes) -> Result<Self, FrameError> {
        expect_type(&header, FrameType::GoAway)?;
        expect_connection_level(&header)?;

        // GOAWAY frame payload is at least 8 bytes
        if payload.len() < 8 {
            return Err(FrameError::InvalidPayloadLength {
                frame_type: header.frame_type,
                expected: 8,
                actual: payload.len(),
            });
        }

        Ok(Self {
            last_stream_id: StreamId::new(payload.get_u32() & 0x7FFF_FFFF),
            error_code: payload.get_u32(),
            debug_data: payload,
        })
    }
}

impl WindowUpdateFrame {
    /// Parse a WINDOW_UPDATE frame from its header and payload.
    pub fn parse(header: FrameHeader, mut payload: Bytes) -> Result<Self, FrameError> {
        expect_type(&header, FrameType::WindowUpdate)?;
        expect_len(&header, &payload, 4)?;

        let increment = payload.get_u32() & 0x7FFF_FFFF;

        // Window increment must be non-zero
        if increment == 0 {
            return Err(FrameError::InvalidWindowIncrement { increment });
        }

        Ok(Self {
            stream_id: header.stream_id,
            increment,
        })
    }
}

impl ContinuationFrame {
    /// Parse a CONTINUATION frame from its header and payload.
    pub fn parse(header: FrameHeader, payload: Bytes) -> Result<Self, FrameError> {
        expect_type(&header, FrameType::Continuation)?;
        expect_stream(&header)?;

        Ok(Self {
            stream_id: header.stream_id,
            end_headers: header.has_flag(flags::END_HEADERS),
            header_block: payload,
        })
    }
}
