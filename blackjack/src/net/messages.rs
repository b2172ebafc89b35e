//! Fixed-layout binary packets.
//!
//! Every packet starts with a 4-byte magic cookie and a 1-byte type tag,
//! all integers in network byte order. Layouts are byte-exact so that any
//! peer speaking the same protocol can interoperate:
//!
//! | Packet   | After cookie + type                 | Size |
//! |----------|-------------------------------------|------|
//! | Offer    | tcp_port: u16, name: 32 bytes       | 39   |
//! | Request  | rounds: u8, name: 32 bytes          | 38   |
//! | Decision | text: 5 bytes (`Hittt` / `Stand`)   | 10   |
//! | Payload  | result: u8, rank: u16, suit: u8     | 9    |
//!
//! Decision and Payload share a type tag; the direction of travel tells
//! them apart.

use bincode::{
    config::{self, Config},
    serde::{decode_from_slice, encode_to_vec},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt;

use super::errors::{PacketError, Result};
use crate::game::entities::{Card, Decision, RoundResult, RoundUpdate};

pub const MAGIC_COOKIE: u32 = 0xabcd_dcba;

pub const OFFER_KIND: u8 = 0x2;
pub const REQUEST_KIND: u8 = 0x3;
pub const PAYLOAD_KIND: u8 = 0x4;

/// Width of the null-padded name field in offers and requests.
pub const NAME_LEN: usize = 32;
/// Width of the decision text field.
pub const DECISION_LEN: usize = 5;

const HIT_TEXT: &[u8; DECISION_LEN] = b"Hittt";
const STAND_TEXT: &[u8; DECISION_LEN] = b"Stand";

/// Big-endian, fixed-width integers, no length prefixes on arrays.
fn wire_config() -> impl Config {
    config::standard()
        .with_big_endian()
        .with_fixed_int_encoding()
}

/// A packet with a fixed size and layout on the wire.
pub trait Packet: Sized {
    /// Exact encoded size in bytes.
    const LEN: usize;

    fn encode(&self) -> Result<Vec<u8>>;

    /// Decode a packet, rejecting anything that isn't exactly `LEN` bytes
    /// or doesn't carry the expected cookie and type.
    fn decode(buf: &[u8]) -> Result<Self>;
}

#[derive(Debug, Deserialize, Serialize)]
struct Header {
    cookie: u32,
    kind: u8,
}

impl Header {
    const fn new(kind: u8) -> Self {
        Self {
            cookie: MAGIC_COOKIE,
            kind,
        }
    }

    fn check(&self, kind: u8) -> Result<()> {
        if self.cookie != MAGIC_COOKIE {
            return Err(PacketError::Cookie(self.cookie));
        }
        if self.kind != kind {
            return Err(PacketError::Kind {
                expected: kind,
                actual: self.kind,
            });
        }
        Ok(())
    }
}

#[derive(Deserialize, Serialize)]
struct OfferFrame {
    header: Header,
    tcp_port: u16,
    name: [u8; NAME_LEN],
}

#[derive(Deserialize, Serialize)]
struct RequestFrame {
    header: Header,
    rounds: u8,
    name: [u8; NAME_LEN],
}

#[derive(Deserialize, Serialize)]
struct DecisionFrame {
    header: Header,
    text: [u8; DECISION_LEN],
}

#[derive(Deserialize, Serialize)]
struct PayloadFrame {
    header: Header,
    result: u8,
    rank: u16,
    suit: u8,
}

fn encode_frame<F: Serialize>(frame: &F) -> Result<Vec<u8>> {
    Ok(encode_to_vec(frame, wire_config())?)
}

fn decode_frame<F: DeserializeOwned>(buf: &[u8], len: usize) -> Result<F> {
    if buf.len() != len {
        return Err(PacketError::Length {
            expected: len,
            actual: buf.len(),
        });
    }
    let (frame, _) = decode_from_slice(buf, wire_config())?;
    Ok(frame)
}

/// Null-pad a name to the fixed field width, truncating longer names.
fn pad_name(name: &str) -> [u8; NAME_LEN] {
    let mut buf = [0; NAME_LEN];
    let bytes = name.as_bytes();
    let len = bytes.len().min(NAME_LEN);
    buf[..len].copy_from_slice(&bytes[..len]);
    buf
}

fn unpad_name(buf: &[u8]) -> String {
    String::from_utf8_lossy(buf)
        .trim_end_matches('\0')
        .to_string()
}

/// A server advertising the TCP port players should connect to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Offer {
    pub tcp_port: u16,
    pub server_name: String,
}

impl fmt::Display for Offer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} on port {}", self.server_name, self.tcp_port)
    }
}

impl Packet for Offer {
    const LEN: usize = 7 + NAME_LEN;

    fn encode(&self) -> Result<Vec<u8>> {
        encode_frame(&OfferFrame {
            header: Header::new(OFFER_KIND),
            tcp_port: self.tcp_port,
            name: pad_name(&self.server_name),
        })
    }

    fn decode(buf: &[u8]) -> Result<Self> {
        let frame: OfferFrame = decode_frame(buf, Self::LEN)?;
        frame.header.check(OFFER_KIND)?;
        Ok(Self {
            tcp_port: frame.tcp_port,
            server_name: unpad_name(&frame.name),
        })
    }
}

/// First message on a new connection: how many rounds to play, and who
/// is asking.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Request {
    pub rounds: u8,
    pub team_name: String,
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} wants {} rounds", self.team_name, self.rounds)
    }
}

impl Packet for Request {
    const LEN: usize = 6 + NAME_LEN;

    fn encode(&self) -> Result<Vec<u8>> {
        encode_frame(&RequestFrame {
            header: Header::new(REQUEST_KIND),
            rounds: self.rounds,
            name: pad_name(&self.team_name),
        })
    }

    fn decode(buf: &[u8]) -> Result<Self> {
        let frame: RequestFrame = decode_frame(buf, Self::LEN)?;
        frame.header.check(REQUEST_KIND)?;
        Ok(Self {
            rounds: frame.rounds,
            team_name: unpad_name(&frame.name),
        })
    }
}

impl Packet for Decision {
    const LEN: usize = 5 + DECISION_LEN;

    fn encode(&self) -> Result<Vec<u8>> {
        let text = match self {
            Self::Hit => HIT_TEXT,
            Self::Stand => STAND_TEXT,
        };
        encode_frame(&DecisionFrame {
            header: Header::new(PAYLOAD_KIND),
            text: *text,
        })
    }

    fn decode(buf: &[u8]) -> Result<Self> {
        let frame: DecisionFrame = decode_frame(buf, Self::LEN)?;
        frame.header.check(PAYLOAD_KIND)?;
        match &frame.text {
            HIT_TEXT => Ok(Self::Hit),
            STAND_TEXT => Ok(Self::Stand),
            other => Err(PacketError::Decision(unpad_name(other))),
        }
    }
}

/// Server payload: a result code plus an optional card. A missing card is
/// sent as rank 0, suit 0.
impl Packet for RoundUpdate {
    const LEN: usize = 9;

    fn encode(&self) -> Result<Vec<u8>> {
        let (rank, suit) = match self.card {
            Some(Card(value, suit)) => (u16::from(value), suit.index()),
            None => (0, 0),
        };
        encode_frame(&PayloadFrame {
            header: Header::new(PAYLOAD_KIND),
            result: self.result.code(),
            rank,
            suit,
        })
    }

    fn decode(buf: &[u8]) -> Result<Self> {
        let frame: PayloadFrame = decode_frame(buf, Self::LEN)?;
        frame.header.check(PAYLOAD_KIND)?;
        let result =
            RoundResult::from_code(frame.result).ok_or(PacketError::ResultCode(frame.result))?;
        let card = match frame.rank {
            0 => None,
            rank => Some(Card::from_wire(rank, frame.suit).ok_or(PacketError::Card {
                rank,
                suit: frame.suit,
            })?),
        };
        Ok(Self { result, card })
    }
}
