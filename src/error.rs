// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `DreamView` library.
//!
//! This module provides an error hierarchy for handling failures across the
//! library: frame construction, link establishment and I/O, reply decoding,
//! and controller-level operations.

use thiserror::Error;

/// The main error type for this library.
///
/// This enum encompasses all possible errors that can occur when interacting
/// with a DreamView light.
#[derive(Debug, Error)]
pub enum Error {
    /// A frame could not be constructed.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// The Bluetooth link failed.
    #[error("link error: {0}")]
    Link(#[from] LinkError),

    /// A device reply could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A controller operation failed.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),
}

impl Error {
    /// Returns true if this error is a transient transport fault.
    ///
    /// Transient faults (failed connects, drops, timed-out refreshes) are
    /// expected on a flaky wireless link and are retried by the next polling
    /// cycle. Frame and decode errors indicate a protocol-contract mismatch
    /// and are not transient.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Link(_) => true,
            Self::Device(err) => match err {
                DeviceError::InitFailed(source)
                | DeviceError::RefreshFailed(source)
                | DeviceError::PartialWrite { source, .. } => source.is_transient(),
                DeviceError::NotInitialized => false,
            },
            Self::Frame(_) | Self::Decode(_) => false,
        }
    }
}

/// Errors related to building protocol frames.
///
/// These are contract errors: a command whose payload cannot fit the fixed
/// frame layout is rejected before any I/O is attempted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// The payload does not fit the fixed 20-byte frame.
    #[error("payload length {actual} exceeds the {max}-byte frame limit")]
    PayloadTooLarge {
        /// Maximum allowed payload length.
        max: usize,
        /// The actual payload length.
        actual: usize,
    },
}

/// Errors related to the physical Bluetooth link.
#[derive(Debug, Error)]
pub enum LinkError {
    /// Connection could not be established within the retry budget.
    #[error("failed to connect after {attempts} attempts: {source}")]
    ConnectFailed {
        /// Number of attempts made before giving up.
        attempts: u32,
        /// The error from the last attempt.
        #[source]
        source: Box<LinkError>,
    },

    /// The link dropped while an operation was in flight.
    #[error("device disconnected")]
    Disconnected,

    /// An operation exceeded its deadline.
    #[error("operation timed out after {0} ms")]
    Timeout(u64),

    /// BLE stack error.
    #[cfg(feature = "ble")]
    #[error("BLE error: {0}")]
    Ble(#[from] btleplug::Error),

    /// Transport-level failure.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Errors related to decoding device replies.
///
/// A malformed reply is always surfaced; the library never substitutes a
/// default value for a field it could not decode.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The reply does not have the expected frame length.
    #[error("reply is {actual} bytes, expected {expected}")]
    UnexpectedLength {
        /// Expected reply length in bytes.
        expected: usize,
        /// The actual reply length.
        actual: usize,
    },

    /// The reply does not begin with the reply marker byte.
    #[error("reply marker mismatch: got {0:#04x}")]
    MarkerMismatch(u8),

    /// The reply echoes a different opcode than the one queried.
    #[error("reply opcode {actual:#04x} does not match query opcode {expected:#04x}")]
    OpcodeMismatch {
        /// The opcode that was queried.
        expected: u8,
        /// The opcode echoed in the reply.
        actual: u8,
    },

    /// The reply checksum does not match its contents.
    #[error("reply checksum mismatch: computed {computed:#04x}, received {received:#04x}")]
    ChecksumMismatch {
        /// Checksum computed over the reply contents.
        computed: u8,
        /// Checksum byte carried by the reply.
        received: u8,
    },

    /// A reply field carries a value outside its schema.
    #[error("invalid {field}: {message}")]
    InvalidValue {
        /// The field that failed to decode.
        field: String,
        /// Description of the decoding failure.
        message: String,
    },
}

/// Errors related to controller operations.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Initial connect-and-read failed.
    #[error("device initialization failed: {0}")]
    InitFailed(#[source] Box<Error>),

    /// A state refresh cycle failed; the cached snapshot is unchanged.
    #[error("state refresh failed: {0}")]
    RefreshFailed(#[source] Box<Error>),

    /// A command batch was interrupted partway through.
    ///
    /// The physical device state is ambiguous until the next successful
    /// refresh; the cached snapshot is left at its last known-good value.
    #[error("wrote {written} of {total} commands before the link failed: {source}")]
    PartialWrite {
        /// Commands written before the failure.
        written: usize,
        /// Commands in the batch.
        total: usize,
        /// The error that interrupted the batch.
        #[source]
        source: Box<Error>,
    },

    /// An operation that requires an initialized controller was called
    /// before `init` completed.
    #[error("controller is not initialized")]
    NotInitialized,
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_error_display() {
        let err = FrameError::PayloadTooLarge { max: 17, actual: 18 };
        assert_eq!(
            err.to_string(),
            "payload length 18 exceeds the 17-byte frame limit"
        );
    }

    #[test]
    fn error_from_frame_error() {
        let frame_err = FrameError::PayloadTooLarge { max: 17, actual: 20 };
        let err: Error = frame_err.into();
        assert!(matches!(
            err,
            Error::Frame(FrameError::PayloadTooLarge { actual: 20, .. })
        ));
    }

    #[test]
    fn connect_failed_display_includes_cause() {
        let err = LinkError::ConnectFailed {
            attempts: 3,
            source: Box::new(LinkError::Transport("adapter off".to_string())),
        };
        assert_eq!(
            err.to_string(),
            "failed to connect after 3 attempts: transport error: adapter off"
        );
    }

    #[test]
    fn decode_error_display() {
        let err = DecodeError::OpcodeMismatch {
            expected: 0x01,
            actual: 0x04,
        };
        assert_eq!(
            err.to_string(),
            "reply opcode 0x04 does not match query opcode 0x01"
        );
    }

    #[test]
    fn transient_classification() {
        let refresh: Error =
            DeviceError::RefreshFailed(Box::new(LinkError::Timeout(3000).into())).into();
        assert!(refresh.is_transient());

        let decode: Error = DecodeError::MarkerMismatch(0x33).into();
        assert!(!decode.is_transient());

        let partial: Error = DeviceError::PartialWrite {
            written: 1,
            total: 3,
            source: Box::new(LinkError::Disconnected.into()),
        }
        .into();
        assert!(partial.is_transient());
    }
}
