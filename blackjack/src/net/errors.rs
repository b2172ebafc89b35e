//! Network error types for packet codec and session operations.

use std::{io, time::Duration};
use thiserror::Error;

use crate::game::RoundError;

/// Errors that can occur while encoding or decoding a packet. Any decode
/// variant means the packet was malformed and is dropped at the boundary.
#[derive(Debug, Error)]
pub enum PacketError {
    /// Failed to encode a packet
    #[error("failed to encode packet: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    /// Failed to decode a packet
    #[error("failed to decode packet: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("bad magic cookie {0:#010x}")]
    Cookie(u32),

    #[error("expected packet type {expected:#x}, got {actual:#x}")]
    Kind { expected: u8, actual: u8 },

    #[error("unknown decision {0:?}")]
    Decision(String),

    #[error("invalid result code {0}")]
    ResultCode(u8),

    #[error("invalid card (rank {rank}, suit {suit})")]
    Card { rank: u16, suit: u8 },
}

/// Errors that end a session. None of these are retried; the owning
/// connection is closed and nothing else is affected.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("malformed packet: {0}")]
    Malformed(#[from] PacketError),

    #[error(transparent)]
    Round(#[from] RoundError),

    #[error("connection lost: {0}")]
    ConnectionLost(io::Error),

    #[error("no packet within {0:?}")]
    Timeout(Duration),

    #[error("I/O error: {0}")]
    Io(io::Error),
}

impl From<io::Error> for SessionError {
    fn from(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::UnexpectedEof
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe => Self::ConnectionLost(error),
            _ => Self::Io(error),
        }
    }
}

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, PacketError>;
