//! HTTP/2 frame errors.

use std::fmt;

use thiserror::Error;

/// HTTP/2 error codes (RFC 7540 Section 7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    /// Graceful shutdown.
    NoError = 0x0,
    /// Protocol error detected.
    ProtocolError = 0x1,
    /// Implementation fault.
    InternalError = 0x2,
    /// Flow control limits exceeded.
    FlowControlError = 0x3,
    /// Settings not acknowledged in time.
    SettingsTimeout = 0x4,
    /// Frame received for closed stream.
    StreamClosed = 0x5,
    /// Frame size incorrect.
    FrameSizeError = 0x6,
    /// Stream not processed.
    RefusedStream = 0x7,
    /// Stream cancelled.
    Cancel = 0x8,
    /// Compression state not updated.
    CompressionError = 0x9,
    /// TCP connection error.
    ConnectError = 0xa,
    /// Processing capacity exceeded.
    EnhanceYourCalm = 0xb,
    /// Negotiated TLS requirements not met.
    InadequateSecurity = 0xc,
    /// HTTP/1.1 required.
    Http11Required = 0xd,
}

impl ErrorCode {
    pub fn from_u32(code: u32) -> Self {
        match code {
            0x0 => ErrorCode::NoError,
            0x1 => ErrorCode::ProtocolError,
            0x2 => ErrorCode::InternalError,
            0x3 => ErrorCode::FlowControlError,
            0x4 => ErrorCode::SettingsTimeout,
            0x5 => ErrorCode::StreamClosed,
            0x6 => ErrorCode::FrameSizeError,
            0x7 => ErrorCode::RefusedStream,
            0x8 => ErrorCode::Cancel,
            0x9 => ErrorCode::CompressionError,
            0xa => ErrorCode::ConnectError,
            0xb => ErrorCode::EnhanceYourCalm,
            0xc => ErrorCode::InadequateSecurity,
            0xd => ErrorCode::Http11Required,
            // Unknown error codes are treated as INTERNAL_ERROR
            _ => ErrorCode::InternalError,
        }
    }

    pub fn to_u32(self) -> u32 {
        self as u32
    }

    /// The RFC 7540 name for this error code.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::NoError => "NO_ERROR",
            ErrorCode::ProtocolError => "PROTOCOL_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::FlowControlError => "FLOW_CONTROL_ERROR",
            ErrorCode::SettingsTimeout => "SETTINGS_TIMEOUT",
            ErrorCode::StreamClosed => "STREAM_CLOSED",
            ErrorCode::FrameSizeError => "FRAME_SIZE_ERROR",
            ErrorCode::RefusedStream => "REFUSED_STREAM",
            ErrorCode::Cancel => "CANCEL",
            ErrorCode::CompressionError => "COMPRESSION_ERROR",
            ErrorCode::ConnectError => "CONNECT_ERROR",
            ErrorCode::EnhanceYourCalm => "ENHANCE_YOUR_CALM",
            ErrorCode::InadequateSecurity => "INADEQUATE_SECURITY",
            ErrorCode::Http11Required => "HTTP_1_1_REQUIRED",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Frame parsing/encoding errors.
///
/// Every variant is fatal to the connection that produced the bytes; the
/// codec never retries or resynchronizes.
#[derive(Debug, Error)]
pub enum FrameError {
    /// Frame header was not exactly 9 bytes.
    #[error("frame header must be 9 bytes, got {len}")]
    MalformedHeader { len: usize },
    /// Payload length disagrees with the header's declared length.
    #[error("header declares {expected} payload bytes, got {actual}")]
    PayloadLengthMismatch { expected: usize, actual: usize },
    /// A typed frame was constructed from a header with the wrong type byte.
    #[error("expected frame type 0x{expected:02x}, got 0x{actual:02x}")]
    FrameTypeMismatch { expected: u8, actual: u8 },
    /// Settings identifier outside the known 0x1..=0x6 range on write.
    #[error("unknown settings identifier 0x{identifier:04x}")]
    UnknownSettingsIdentifier { identifier: u16 },
    /// Frame exceeds maximum allowed size.
    #[error("frame size {size} exceeds maximum {max}")]
    FrameTooLarge { size: u32, max: u32 },
    /// Invalid frame for stream 0 (connection-level).
    #[error("frame type 0x{frame_type:02x} invalid on stream 0")]
    InvalidStreamZero { frame_type: u8 },
    /// Frame requires non-zero stream ID.
    #[error("frame type 0x{frame_type:02x} requires non-zero stream ID")]
    StreamIdRequired { frame_type: u8 },
    /// Invalid frame payload length for the frame type.
    #[error("frame type 0x{frame_type:02x} expected {expected} bytes, got {actual}")]
    InvalidPayloadLength {
        frame_type: u8,
        expected: usize,
        actual: usize,
    },
    /// Invalid padding length.
    #[error("padding length {pad_length} exceeds payload length {payload_length}")]
    InvalidPadding {
        pad_length: u8,
        payload_length: usize,
    },
    /// Invalid setting value.
    #[error("invalid value {value} for setting 0x{id:04x}")]
    InvalidSettingValue { id: u16, value: u32 },
    /// Invalid window update increment.
    #[error("invalid window increment {increment}")]
    InvalidWindowIncrement { increment: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    // ErrorCode tests

    #[test]
    fn test_error_code_from_u32() {
        assert_eq!(ErrorCode::from_u32(0x0), ErrorCode::NoError);
        assert_eq!(ErrorCode::from_u32(0x1), ErrorCode::ProtocolError);
        assert_eq!(ErrorCode::from_u32(0x3), ErrorCode::FlowControlError);
        assert_eq!(ErrorCode::from_u32(0x6), ErrorCode::FrameSizeError);
        assert_eq!(ErrorCode::from_u32(0x9), ErrorCode::CompressionError);
        assert_eq!(ErrorCode::from_u32(0xd), ErrorCode::Http11Required);
    }

    #[test]
    fn test_error_code_from_u32_unknown() {
        // Unknown codes map to InternalError
        assert_eq!(ErrorCode::from_u32(0xe), ErrorCode::InternalError);
        assert_eq!(ErrorCode::from_u32(0xff), ErrorCode::InternalError);
        assert_eq!(ErrorCode::from_u32(0xffffffff), ErrorCode::InternalError);
    }

    #[test]
    fn test_error_code_roundtrip() {
        let codes = [
            ErrorCode::NoError,
            ErrorCode::ProtocolError,
            ErrorCode::InternalError,
            ErrorCode::FlowControlError,
            ErrorCode::SettingsTimeout,
            ErrorCode::StreamClosed,
            ErrorCode::FrameSizeError,
            ErrorCode::RefusedStream,
            ErrorCode::Cancel,
            ErrorCode::CompressionError,
            ErrorCode::ConnectError,
            ErrorCode::EnhanceYourCalm,
            ErrorCode::InadequateSecurity,
            ErrorCode::Http11Required,
        ];

        for code in codes {
            assert_eq!(ErrorCode::from_u32(code.to_u32()), code);
        }
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(format!("{}", ErrorCode::NoError), "NO_ERROR");
        assert_eq!(format!("{}", ErrorCode::ProtocolError), "PROTOCOL_ERROR");
        assert_eq!(
            format!("{}", ErrorCode::CompressionError),
            "COMPRESSION_ERROR"
        );
        assert_eq!(
            format!("{}", ErrorCode::EnhanceYourCalm),
            "ENHANCE_YOUR_CALM"
        );
        assert_eq!(
            format!("{}", ErrorCode::Http11Required),
            "HTTP_1_1_REQUIRED"
        );
    }

    // FrameError tests

    #[test]
    fn test_frame_error_malformed_header_display() {
        let err = FrameError::MalformedHeader { len: 4 };
        assert_eq!(format!("{}", err), "frame header must be 9 bytes, got 4");
    }

    #[test]
    fn test_frame_error_payload_length_mismatch_display() {
        let err = FrameError::PayloadLengthMismatch {
            expected: 6,
            actual: 0,
        };
        assert_eq!(format!("{}", err), "header declares 6 payload bytes, got 0");
    }

    #[test]
    fn test_frame_error_frame_type_mismatch_display() {
        let err = FrameError::FrameTypeMismatch {
            expected: 0x0,
            actual: 0x4,
        };
        assert_eq!(format!("{}", err), "expected frame type 0x00, got 0x04");
    }

    #[test]
    fn test_frame_error_unknown_settings_identifier_display() {
        let err = FrameError::UnknownSettingsIdentifier { identifier: 0x99 };
        assert_eq!(format!("{}", err), "unknown settings identifier 0x0099");
    }

    #[test]
    fn test_frame_error_frame_too_large_display() {
        let err = FrameError::FrameTooLarge {
            size: 20000,
            max: 16384,
        };
        assert_eq!(format!("{}", err), "frame size 20000 exceeds maximum 16384");
    }

    #[test]
    fn test_frame_error_invalid_payload_length_display() {
        let err = FrameError::InvalidPayloadLength {
            frame_type: 0x04,
            expected: 6,
            actual: 10,
        };
        assert_eq!(
            format!("{}", err),
            "frame type 0x04 expected 6 bytes, got 10"
        );
    }

    #[test]
    fn test_frame_error_invalid_padding_display() {
        let err = FrameError::InvalidPadding {
            pad_length: 100,
            payload_length: 50,
        };
        assert_eq!(
            format!("{}", err),
            "padding length 100 exceeds payload length 50"
        );
    }

    #[test]
    fn test_frame_error_is_error() {
        fn assert_error<E: std::error::Error>() {}
        assert_error::<FrameError>();
    }
}
