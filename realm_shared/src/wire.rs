//! Wire protocol.
//!
//! Goals:
//! - One closed, versioned set of message types shared with the server.
//! - A fixed-width 16-bit discriminant on the wire so routing and
//!   compatibility checks never depend on payload parsing.
//! - Keep payload serialization explicit and versionable.
//!
//! Frame layout: `u32` big-endian body length, then the body: `u16`
//! big-endian discriminant followed by the JSON payload.

use anyhow::{anyhow, bail, Context};
use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// Protocol version negotiated via `VersionRequest`/`VersionResponse`
/// before any other message is trusted.
pub const PROTOCOL_VERSION: u32 = 1;

/// Upper bound on a frame body; anything larger is a desynced stream.
pub const MAX_FRAME_LEN: usize = 64 * 1024;

/// Identifies a player for the lifetime of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

/// Wire discriminant for a [`Message`].
///
/// Values are stable across protocol versions and are never reused for a
/// different semantic meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum MessageKind {
    VersionRequest = 0,
    VersionResponse = 1,
    LoginRequest = 2,
    LoginResponse = 3,
    RegisterRequest = 4,
    RegisterResponse = 5,
    PlayerMove = 6,
    OtherPlayerMove = 7,
    PlayerStop = 8,
    OtherPlayerStop = 9,
    PlayerJoin = 10,
    PlayerLeave = 11,
    PlayersRequest = 12,
    PlayersResponse = 13,
}

impl MessageKind {
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    pub fn from_u16(raw: u16) -> Option<Self> {
        Some(match raw {
            0 => Self::VersionRequest,
            1 => Self::VersionResponse,
            2 => Self::LoginRequest,
            3 => Self::LoginResponse,
            4 => Self::RegisterRequest,
            5 => Self::RegisterResponse,
            6 => Self::PlayerMove,
            7 => Self::OtherPlayerMove,
            8 => Self::PlayerStop,
            9 => Self::OtherPlayerStop,
            10 => Self::PlayerJoin,
            11 => Self::PlayerLeave,
            12 => Self::PlayersRequest,
            13 => Self::PlayersResponse,
            _ => return None,
        })
    }
}

/// One player's authoritative state in a roster snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub position: Vec2,
    pub velocity: Vec2,
}

/// High-level message envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Message {
    // ─── Handshake ───
    VersionRequest,
    VersionResponse {
        version: u32,
    },

    // ─── Account ───
    LoginRequest {
        username: String,
        password: String,
    },
    LoginResponse {
        success: bool,
        player_id: Option<PlayerId>,
        spawn: Option<Vec2>,
    },
    RegisterRequest {
        username: String,
        password: String,
    },
    RegisterResponse {
        success: bool,
    },

    // ─── Movement replication ───
    /// Client -> server: the local player started or changed movement.
    PlayerMove {
        position: Vec2,
        velocity: Vec2,
    },
    /// Server -> client: a remote player started or changed movement.
    OtherPlayerMove {
        player_id: PlayerId,
        position: Vec2,
        velocity: Vec2,
    },
    /// Client -> server: the local player stopped.
    PlayerStop {
        position: Vec2,
    },
    /// Server -> client: a remote player stopped at a position.
    OtherPlayerStop {
        player_id: PlayerId,
        position: Vec2,
    },

    // ─── Lifecycle ───
    PlayerJoin {
        player_id: PlayerId,
        position: Vec2,
    },
    PlayerLeave {
        player_id: PlayerId,
    },

    // ─── Roster ───
    PlayersRequest,
    /// Authoritative roster snapshot answering a `PlayersRequest`.
    PlayersResponse {
        players: Vec<PlayerSnapshot>,
    },
}

impl Message {
    /// Returns the wire discriminant for this message.
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::VersionRequest => MessageKind::VersionRequest,
            Message::VersionResponse { .. } => MessageKind::VersionResponse,
            Message::LoginRequest { .. } => MessageKind::LoginRequest,
            Message::LoginResponse { .. } => MessageKind::LoginResponse,
            Message::RegisterRequest { .. } => MessageKind::RegisterRequest,
            Message::RegisterResponse { .. } => MessageKind::RegisterResponse,
            Message::PlayerMove { .. } => MessageKind::PlayerMove,
            Message::OtherPlayerMove { .. } => MessageKind::OtherPlayerMove,
            Message::PlayerStop { .. } => MessageKind::PlayerStop,
            Message::OtherPlayerStop { .. } => MessageKind::OtherPlayerStop,
            Message::PlayerJoin { .. } => MessageKind::PlayerJoin,
            Message::PlayerLeave { .. } => MessageKind::PlayerLeave,
            Message::PlayersRequest => MessageKind::PlayersRequest,
            Message::PlayersResponse { .. } => MessageKind::PlayersResponse,
        }
    }
}

/// Encodes a full frame: length prefix, discriminant, payload.
pub fn encode_frame(msg: &Message) -> anyhow::Result<Bytes> {
    let payload = serde_json::to_vec(msg).context("serialize message")?;
    let body_len = 2 + payload.len();
    if body_len > MAX_FRAME_LEN {
        bail!("frame body {} exceeds max {}", body_len, MAX_FRAME_LEN);
    }
    let mut buf = BytesMut::with_capacity(4 + body_len);
    buf.put_u32(body_len as u32);
    buf.put_u16(msg.kind().as_u16());
    buf.extend_from_slice(&payload);
    Ok(buf.freeze())
}

/// Decodes one frame body (everything after the length prefix).
///
/// Failure cases are kept distinguishable for diagnostics: truncated body,
/// unknown discriminant, malformed payload, discriminant/payload mismatch.
pub fn decode_frame(body: &[u8]) -> anyhow::Result<Message> {
    if body.len() < 2 {
        bail!("truncated frame body: {} bytes", body.len());
    }
    let raw = u16::from_be_bytes([body[0], body[1]]);
    let kind = MessageKind::from_u16(raw).ok_or_else(|| anyhow!("unknown discriminant {raw}"))?;
    let msg: Message = serde_json::from_slice(&body[2..])
        .with_context(|| format!("malformed {kind:?} payload"))?;
    if msg.kind() != kind {
        bail!("discriminant {kind:?} does not match payload {:?}", msg.kind());
    }
    Ok(msg)
}
