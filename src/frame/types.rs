//! HTTP/2 frame type definitions.

use bytes::Bytes;

use super::FRAME_HEADER_SIZE;
use super::error::{ErrorCode, FrameError};

/// HTTP/2 frame types (RFC 7540 Section 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FrameType {
    Data = 0x0,
    Headers = 0x1,
    Priority = 0x2,
    RstStream = 0x3,
    Settings = 0x4,
    PushPromise = 0x5,
    Ping = 0x6,
    GoAway = 0x7,
    WindowUpdate = 0x8,
    Continuation = 0x9,
}

impl FrameType {
    /// Try to convert a byte to a frame type.
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0x0 => Some(FrameType::Data),
            0x1 => Some(FrameType::Headers),
            0x2 => Some(FrameType::Priority),
            0x3 => Some(FrameType::RstStream),
            0x4 => Some(FrameType::Settings),
            0x5 => Some(FrameType::PushPromise),
            0x6 => Some(FrameType::Ping),
            0x7 => Some(FrameType::GoAway),
            0x8 => Some(FrameType::WindowUpdate),
            0x9 => Some(FrameType::Continuation),
            _ => None,
        }
    }

    /// Derive the set of flag names set in `flags`, using this frame
    /// type's bit meanings. Bits without a defined meaning are ignored.
    pub fn flag_names(self, flags: u8) -> Vec<&'static str> {
        let mut names = Vec::new();
        match self {
            FrameType::Data => {
                if flags & flags::END_STREAM != 0 {
                    names.push("END_STREAM");
                }
                if flags & flags::PADDED != 0 {
                    names.push("PADDED");
                }
            }
            FrameType::Headers => {
                if flags & flags::END_STREAM != 0 {
                    names.push("END_STREAM");
                }
                if flags & flags::END_HEADERS != 0 {
                    names.push("END_HEADERS");
                }
                if flags & flags::PADDED != 0 {
                    names.push("PADDED");
                }
                if flags & flags::PRIORITY != 0 {
                    names.push("PRIORITY");
                }
            }
            FrameType::Settings | FrameType::Ping => {
                if flags & flags::ACK != 0 {
                    names.push("ACK");
                }
            }
            FrameType::PushPromise => {
                if flags & flags::END_HEADERS != 0 {
                    names.push("END_HEADERS");
                }
                if flags & flags::PADDED != 0 {
                    names.push("PADDED");
                }
            }
            FrameType::Continuation => {
                if flags & flags::END_HEADERS != 0 {
                    names.push("END_HEADERS");
                }
            }
            FrameType::Priority | FrameType::RstStream | FrameType::GoAway
            | FrameType::WindowUpdate => {}
        }
        names
    }
}

/// Frame flags.
pub mod flags {
    /// DATA/HEADERS frame: indicates this is the last frame.
    pub const END_STREAM: u8 = 0x1;
    /// DATA/HEADERS/PUSH_PROMISE frame: padding is present.
    pub const PADDED: u8 = 0x8;
    /// HEADERS/PUSH_PROMISE/CONTINUATION frame: last header block fragment.
    pub const END_HEADERS: u8 = 0x4;
    /// HEADERS frame: priority information is present.
    pub const PRIORITY: u8 = 0x20;
    /// SETTINGS/PING frame: this is an acknowledgment.
    pub const ACK: u8 = 0x1;
}

/// Stream identifier (31 bits, high bit reserved).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StreamId(pub u32);

impl StreamId {
    /// Connection-level stream (stream 0).
    pub const CONNECTION: StreamId = StreamId(0);

    /// Create a new stream ID, masking the reserved bit.
    #[inline]
    pub fn new(id: u32) -> Self {
        StreamId(id & 0x7FFF_FFFF)
    }

    /// Get the raw stream ID value.
    #[inline]
    pub fn value(self) -> u32 {
        self.0
    }

    /// Check if this is the connection-level stream.
    #[inline]
    pub fn is_connection_level(self) -> bool {
        self.0 == 0
    }

    /// Check if this is a client-initiated stream (odd numbers).
    #[inline]
    pub fn is_client_initiated(self) -> bool {
        self.0 % 2 == 1
    }

    /// Check if this is a server-initiated stream (even numbers, non-zero).
    #[inline]
    pub fn is_server_initiated(self) -> bool {
        self.0 != 0 && self.0.is_multiple_of(2)
    }
}

impl From<u32> for StreamId {
    fn from(id: u32) -> Self {
        StreamId::new(id)
    }
}

/// Raw frame header.
///
/// The 9-byte wire layout is owned entirely by [`FrameHeader::parse`] and
/// [`FrameHeader::build`]; every other part of the codec goes through them.
#[derive(Debug, Clone, Copy)]
pub struct FrameHeader {
    /// Payload length (24 bits).
    pub length: u32,
    /// Frame type.
    pub frame_type: u8,
    /// Frame flags.
    pub flags: u8,
    /// Stream identifier.
    pub stream_id: StreamId,
}

impl FrameHeader {
    /// Create a new frame header.
    pub fn new(frame_type: FrameType, flags: u8, stream_id: StreamId, length: u32) -> Self {
        Self {
            length,
            frame_type: frame_type as u8,
            flags,
            stream_id,
        }
    }

    /// Parse a frame header from exactly 9 bytes.
    ///
    /// The stream identifier's reserved bit is masked off on read.
    pub fn parse(buf: &[u8]) -> Result<Self, FrameError> {
        if buf.len() != FRAME_HEADER_SIZE {
            return Err(FrameError::MalformedHeader { len: buf.len() });
        }

        // Length is 24 bits (3 bytes), big-endian
        let length = u32::from_be_bytes([0, buf[0], buf[1], buf[2]]);
        let frame_type = buf[3];
        let flags = buf[4];
        // Stream ID is 31 bits (4 bytes), big-endian, high bit reserved
        let stream_id = StreamId::new(u32::from_be_bytes([buf[5], buf[6], buf[7], buf[8]]));

        Ok(Self {
            length,
            frame_type,
            flags,
            stream_id,
        })
    }

    /// Serialize this header to its 9-byte wire form.
    ///
    /// The stream identifier's reserved bit is always written as zero.
    pub fn build(&self) -> [u8; FRAME_HEADER_SIZE] {
        let mut buf = [0u8; FRAME_HEADER_SIZE];
        buf[0] = (self.length >> 16) as u8;
        buf[1] = (self.length >> 8) as u8;
        buf[2] = self.length as u8;
        buf[3] = self.frame_type;
        buf[4] = self.flags;
        buf[5..9].copy_from_slice(&(self.stream_id.value() & 0x7FFF_FFFF).to_be_bytes());
        buf
    }

    /// Get the frame type as an enum, if known.
    pub fn get_type(&self) -> Option<FrameType> {
        FrameType::from_u8(self.frame_type)
    }

    /// Check if a flag is set.
    #[inline]
    pub fn has_flag(&self, flag: u8) -> bool {
        self.flags & flag != 0
    }
}

/// Parsed HTTP/2 frame.
#[derive(Debug, Clone)]
pub enum Frame {
    Data(DataFrame),
    Headers(HeadersFrame),
    Priority(PriorityFrame),
    RstStream(RstStreamFrame),
    Settings(SettingsFrame),
    PushPromise(PushPromiseFrame),
    Ping(PingFrame),
    GoAway(GoAwayFrame),
    WindowUpdate(WindowUpdateFrame),
    Continuation(ContinuationFrame),
    /// Unknown frame type (must be ignored per spec).
    Unknown(UnknownFrame),
}

impl Frame {
    /// Get the stream ID for this frame.
    pub fn stream_id(&self) -> StreamId {
        match self {
            Frame::Data(f) => f.stream_id,
            Frame::Headers(f) => f.stream_id,
            Frame::Priority(f) => f.stream_id,
            Frame::RstStream(f) => f.stream_id,
            Frame::Settings(_) => StreamId::CONNECTION,
            Frame::PushPromise(f) => f.stream_id,
            Frame::Ping(_) => StreamId::CONNECTION,
            Frame::GoAway(_) => StreamId::CONNECTION,
            Frame::WindowUpdate(f) => f.stream_id,
            Frame::Continuation(f) => f.stream_id,
            Frame::Unknown(f) => f.stream_id,
        }
    }
}

/// DATA frame (type=0x0).
#[derive(Debug, Clone, Default)]
pub struct DataFrame {
    pub stream_id: StreamId,
    pub end_stream: bool,
    pub data: Bytes,
}

/// HEADERS frame (type=0x1).
#[derive(Debug, Clone, Default)]
pub struct HeadersFrame {
    pub stream_id: StreamId,
    pub end_stream: bool,
    pub end_headers: bool,
    pub priority: Option<Priority>,
    /// HPACK-encoded header block fragment.
    pub header_block: Bytes,
}

/// Stream priority information.
#[derive(Debug, Clone, Copy)]
pub struct Priority {
    /// Whether the dependency is exclusive.
    pub exclusive: bool,
    /// Stream dependency.
    pub dependency: StreamId,
    /// Weight (1-256, stored as 0-255).
    pub weight: u8,
}

/// PRIORITY frame (type=0x2).
#[derive(Debug, Clone, Copy)]
pub struct PriorityFrame {
    pub stream_id: StreamId,
    pub priority: Priority,
}

/// RST_STREAM frame (type=0x3).
#[derive(Debug, Clone, Copy)]
pub struct RstStreamFrame {
    pub stream_id: StreamId,
    pub error_code: u32,
}

impl RstStreamFrame {
    /// Interpret the raw error code.
    pub fn error(&self) -> ErrorCode {
        ErrorCode::from_u32(self.error_code)
    }
}

/// SETTINGS frame (type=0x4).
#[derive(Debug, Clone, Default)]
pub struct SettingsFrame {
    pub ack: bool,
    pub settings: Vec<Setting>,
}

impl SettingsFrame {
    /// Create an empty (non-ACK) SETTINGS frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a SETTINGS acknowledgment frame.
    pub fn ack() -> Self {
        Self {
            ack: true,
            settings: Vec::new(),
        }
    }

    /// Append a parameter by its 16-bit identifier code.
    ///
    /// Identifier codes outside the known set are rejected; a peer must
    /// never be sent a parameter this endpoint cannot name.
    pub fn set_parameter(&mut self, identifier: u16, value: u32) -> Result<(), FrameError> {
        let id = SettingId::from_u16(identifier)
            .ok_or(FrameError::UnknownSettingsIdentifier { identifier })?;
        self.settings.push(Setting { id, value });
        Ok(())
    }

    /// The ordered parameter list carried by this frame.
    pub fn parameters(&self) -> &[Setting] {
        &self.settings
    }
}

/// Individual setting in a SETTINGS frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Setting {
    pub id: SettingId,
    pub value: u32,
}

/// Known setting identifiers (RFC 7540 Section 6.5.2).
///
/// Identifier codes outside this set are skipped when reading a SETTINGS
/// payload and rejected when writing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum SettingId {
    HeaderTableSize = 0x1,
    EnablePush = 0x2,
    MaxConcurrentStreams = 0x3,
    InitialWindowSize = 0x4,
    MaxFrameSize = 0x5,
    MaxHeaderListSize = 0x6,
}

impl SettingId {
    pub fn from_u16(id: u16) -> Option<Self> {
        match id {
            0x1 => Some(SettingId::HeaderTableSize),
            0x2 => Some(SettingId::EnablePush),
            0x3 => Some(SettingId::MaxConcurrentStreams),
            0x4 => Some(SettingId::InitialWindowSize),
            0x5 => Some(SettingId::MaxFrameSize),
            0x6 => Some(SettingId::MaxHeaderListSize),
            _ => None,
        }
    }

    pub fn to_u16(self) -> u16 {
        self as u16
    }
}

/// PUSH_PROMISE frame (type=0x5).
#[derive(Debug, Clone)]
pub struct PushPromiseFrame {
    pub stream_id: StreamId,
    pub end_headers: bool,
    pub promised_stream_id: StreamId,
    /// HPACK-encoded header block fragment.
    pub header_block: Bytes,
}

/// PING frame (type=0x6).
#[derive(Debug, Clone, Copy, Default)]
pub struct PingFrame {
    pub ack: bool,
    pub data: [u8; 8],
}

/// GOAWAY frame (type=0x7).
#[derive(Debug, Clone)]
pub struct GoAwayFrame {
    pub last_stream_id: StreamId,
    pub error_code: u32,
    pub debug_data: Bytes,
}

impl GoAwayFrame {
    /// Interpret the raw error code.
    pub fn error(&self) -> ErrorCode {
        ErrorCode::from_u32(self.error_code)
    }
}

/// WINDOW_UPDATE frame (type=0x8).
#[derive(Debug, Clone, Copy)]
pub struct WindowUpdateFrame {
    pub stream_id: StreamId,
    pub increment: u32,
}

/// CONTINUATION frame (type=0x9).
#[derive(Debug, Clone)]
pub struct ContinuationFrame {
    pub stream_id: StreamId,
    pub end_headers: bool,
    /// HPACK-encoded header block fragment.
    pub header_block: Bytes,
}

/// Unknown frame type.
#[derive(Debug, Clone)]
pub struct UnknownFrame {
    pub frame_type: u8,
    pub flags: u8,
    pub stream_id: StreamId,
    pub payload: Bytes,
}

#[cfg(test)]
mod tests {
    use super::*;

    // FrameType tests

    #[test]
    fn test_frame_type_from_u8() {
        assert_eq!(FrameType::from_u8(0x0), Some(FrameType::Data));
        assert_eq!(FrameType::from_u8(0x1), Some(FrameType::Headers));
        assert_eq!(FrameType::from_u8(0x2), Some(FrameType::Priority));
        assert_eq!(FrameType::from_u8(0x3), Some(FrameType::RstStream));
        assert_eq!(FrameType::from_u8(0x4), Some(FrameType::Settings));
        assert_eq!(FrameType::from_u8(0x5), Some(FrameType::PushPromise));
        assert_eq!(FrameType::from_u8(0x6), Some(FrameType::Ping));
        assert_eq!(FrameType::from_u8(0x7), Some(FrameType::GoAway));
        assert_eq!(FrameType::from_u8(0x8), Some(FrameType::WindowUpdate));
        assert_eq!(FrameType::from_u8(0x9), Some(FrameType::Continuation));
    }

    #[test]
    fn test_frame_type_from_u8_unknown() {
        assert_eq!(FrameType::from_u8(0xa), None);
        assert_eq!(FrameType::from_u8(0xff), None);
    }

    #[test]
    fn test_flag_names_data() {
        // 0x1 | 0x8
        assert_eq!(
            FrameType::Data.flag_names(9),
            vec!["END_STREAM", "PADDED"]
        );
        assert_eq!(FrameType::Data.flag_names(0), Vec::<&str>::new());
        // END_HEADERS has no meaning on DATA
        assert_eq!(FrameType::Data.flag_names(0x4), Vec::<&str>::new());
    }

    #[test]
    fn test_flag_names_headers() {
        assert_eq!(
            FrameType::Headers.flag_names(0x1 | 0x4 | 0x8 | 0x20),
            vec!["END_STREAM", "END_HEADERS", "PADDED", "PRIORITY"]
        );
        assert_eq!(FrameType::Headers.flag_names(0x4), vec!["END_HEADERS"]);
    }

    #[test]
    fn test_flag_names_settings_and_ping() {
        assert_eq!(FrameType::Settings.flag_names(0x1), vec!["ACK"]);
        assert_eq!(FrameType::Settings.flag_names(0), Vec::<&str>::new());
        assert_eq!(FrameType::Ping.flag_names(0x1), vec!["ACK"]);
    }

    #[test]
    fn test_flag_names_continuation() {
        assert_eq!(FrameType::Continuation.flag_names(0x4), vec!["END_HEADERS"]);
        assert_eq!(FrameType::RstStream.flag_names(0xff), Vec::<&str>::new());
    }

    // StreamId tests

    #[test]
    fn test_stream_id_new() {
        let id = StreamId::new(1);
        assert_eq!(id.value(), 1);
    }

    #[test]
    fn test_stream_id_masks_reserved_bit() {
        // High bit should be masked off
        let id = StreamId::new(0x80000001);
        assert_eq!(id.value(), 1);
    }

    #[test]
    fn test_stream_id_connection_level() {
        assert!(StreamId::CONNECTION.is_connection_level());
        assert!(StreamId::new(0).is_connection_level());
        assert!(!StreamId::new(1).is_connection_level());
    }

    #[test]
    fn test_stream_id_client_initiated() {
        assert!(StreamId::new(1).is_client_initiated());
        assert!(StreamId::new(3).is_client_initiated());
        assert!(!StreamId::new(0).is_client_initiated());
        assert!(!StreamId::new(2).is_client_initiated());
    }

    #[test]
    fn test_stream_id_server_initiated() {
        assert!(StreamId::new(2).is_server_initiated());
        assert!(StreamId::new(4).is_server_initiated());
        assert!(!StreamId::new(0).is_server_initiated());
        assert!(!StreamId::new(1).is_server_initiated());
    }

    #[test]
    fn test_stream_id_from_u32() {
        let id: StreamId = 42.into();
        assert_eq!(id.value(), 42);
    }

    // FrameHeader tests

    #[test]
    fn test_frame_header_new() {
        let header = FrameHeader::new(FrameType::Data, flags::END_STREAM, StreamId::new(1), 100);

        assert_eq!(header.frame_type, 0x0);
        assert_eq!(header.flags, flags::END_STREAM);
        assert_eq!(header.stream_id.value(), 1);
        assert_eq!(header.length, 100);
    }

    #[test]
    fn test_frame_header_parse() {
        let header = FrameHeader::parse(&[0x00, 0x00, 0x06, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00])
            .unwrap();
        assert_eq!(header.length, 6);
        assert_eq!(header.frame_type, 0x04);
        assert_eq!(header.flags, 0);
        assert_eq!(header.stream_id, StreamId::CONNECTION);
        assert_eq!(header.get_type(), Some(FrameType::Settings));
    }

    #[test]
    fn test_frame_header_parse_masks_reserved_bit() {
        let header = FrameHeader::parse(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x80, 0x00, 0x00, 0x01])
            .unwrap();
        assert_eq!(header.stream_id.value(), 1);
    }

    #[test]
    fn test_frame_header_parse_wrong_length() {
        let err = FrameHeader::parse(&[0x00, 0x00]).unwrap_err();
        assert!(matches!(err, FrameError::MalformedHeader { len: 2 }));

        let err = FrameHeader::parse(&[0u8; 10]).unwrap_err();
        assert!(matches!(err, FrameError::MalformedHeader { len: 10 }));
    }

    #[test]
    fn test_frame_header_build() {
        let header = FrameHeader::new(FrameType::Headers, flags::END_HEADERS, StreamId::new(3), 5);
        assert_eq!(
            header.build(),
            [0x00, 0x00, 0x05, 0x01, 0x04, 0x00, 0x00, 0x00, 0x03]
        );
    }

    #[test]
    fn test_frame_header_build_zeroes_reserved_bit() {
        let header = FrameHeader {
            length: 0,
            frame_type: 0,
            flags: 0,
            stream_id: StreamId(0xFFFF_FFFF),
        };
        let bytes = header.build();
        assert_eq!(bytes[5], 0x7F);
        assert_eq!(&bytes[6..9], &[0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_frame_header_parse_build_roundtrip() {
        let wire = [0x12, 0x34, 0x56, 0x01, 0x05, 0x00, 0x00, 0x00, 0x07];
        let header = FrameHeader::parse(&wire).unwrap();
        assert_eq!(header.length, 0x123456);
        assert_eq!(header.build(), wire);
    }

    #[test]
    fn test_frame_header_has_flag() {
        let header = FrameHeader::new(
            FrameType::Headers,
            flags::END_STREAM | flags::END_HEADERS,
            StreamId::new(1),
            0,
        );

        assert!(header.has_flag(flags::END_STREAM));
        assert!(header.has_flag(flags::END_HEADERS));
        assert!(!header.has_flag(flags::PADDED));
    }

    // Frame tests

    #[test]
    fn test_frame_stream_id_data() {
        let frame = Frame::Data(DataFrame {
            stream_id: StreamId::new(5),
            end_stream: false,
            data: Bytes::new(),
        });
        assert_eq!(frame.stream_id().value(), 5);
    }

    #[test]
    fn test_frame_stream_id_settings() {
        let frame = Frame::Settings(SettingsFrame::new());
        assert_eq!(frame.stream_id().value(), 0);
    }

    #[test]
    fn test_frame_stream_id_continuation() {
        let frame = Frame::Continuation(ContinuationFrame {
            stream_id: StreamId::new(17),
            end_headers: true,
            header_block: Bytes::new(),
        });
        assert_eq!(frame.stream_id().value(), 17);
    }

    #[test]
    fn test_frame_stream_id_unknown() {
        let frame = Frame::Unknown(UnknownFrame {
            frame_type: 0xff,
            flags: 0,
            stream_id: StreamId::new(19),
            payload: Bytes::new(),
        });
        assert_eq!(frame.stream_id().value(), 19);
    }

    // SettingId tests

    #[test]
    fn test_setting_id_from_u16() {
        assert_eq!(SettingId::from_u16(0x1), Some(SettingId::HeaderTableSize));
        assert_eq!(SettingId::from_u16(0x2), Some(SettingId::EnablePush));
        assert_eq!(
            SettingId::from_u16(0x3),
            Some(SettingId::MaxConcurrentStreams)
        );
        assert_eq!(SettingId::from_u16(0x4), Some(SettingId::InitialWindowSize));
        assert_eq!(SettingId::from_u16(0x5), Some(SettingId::MaxFrameSize));
        assert_eq!(SettingId::from_u16(0x6), Some(SettingId::MaxHeaderListSize));
        assert_eq!(SettingId::from_u16(0x0), None);
        assert_eq!(SettingId::from_u16(0x99), None);
    }

    #[test]
    fn test_setting_id_roundtrip() {
        let ids = [
            SettingId::HeaderTableSize,
            SettingId::EnablePush,
            SettingId::MaxConcurrentStreams,
            SettingId::InitialWindowSize,
            SettingId::MaxFrameSize,
            SettingId::MaxHeaderListSize,
        ];

        for id in ids {
            assert_eq!(SettingId::from_u16(id.to_u16()), Some(id));
        }
    }

    // SettingsFrame parameter tests

    #[test]
    fn test_settings_set_parameter() {
        let mut frame = SettingsFrame::new();
        frame.set_parameter(0x1, 4096).unwrap();
        frame.set_parameter(0x3, 100).unwrap();

        assert_eq!(
            frame.parameters(),
            &[
                Setting {
                    id: SettingId::HeaderTableSize,
                    value: 4096
                },
                Setting {
                    id: SettingId::MaxConcurrentStreams,
                    value: 100
                },
            ]
        );
    }

    #[test]
    fn test_settings_set_parameter_unknown_identifier() {
        let mut frame = SettingsFrame::new();
        let err = frame.set_parameter(0x99, 1).unwrap_err();
        assert!(matches!(
            err,
            FrameError::UnknownSettingsIdentifier { identifier: 0x99 }
        ));
        assert!(frame.parameters().is_empty());
    }

    #[test]
    fn test_settings_ack_constructor() {
        let frame = SettingsFrame::ack();
        assert!(frame.ack);
        assert!(frame.settings.is_empty());
    }

    // Error interpretation tests

    #[test]
    fn test_rst_stream_error() {
        let frame = RstStreamFrame {
            stream_id: StreamId::new(1),
            error_code: 0x8,
        };
        assert_eq!(frame.error(), ErrorCode::Cancel);
    }

    #[test]
    fn test_goaway_error() {
        let frame = GoAwayFrame {
            last_stream_id: StreamId::new(10),
            error_code: 0x9,
            debug_data: Bytes::from_static(b"compression state lost"),
        };
        assert_eq!(frame.error(), ErrorCode::CompressionError);
    }

    #[test]
    fn test_frame_clone() {
        let frame = Frame::Data(DataFrame {
            stream_id: StreamId::new(1),
            end_stream: true,
            data: Bytes::from_static(b"test"),
        });
        let cloned = frame.clone();
        assert_eq!(cloned.stream_id().value(), 1);
    }
}
