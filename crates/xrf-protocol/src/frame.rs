//! Transport frame encoding/decoding.
//!
//! The serial link between host and dongle carries framed messages:
//!
//! ```text
//! +--------+--------+----------------------+
//! | tag    | length | payload[0..length-2] |
//! +--------+--------+----------------------+
//! ```
//!
//! The tag byte identifies the frame kind (`R`/`T`/`C`/`L`) and the length
//! byte counts the whole frame including the two header bytes, so a frame is
//! complete once `length - 2` payload bytes have been collected.

use bytes::BytesMut;

use crate::constants::*;

/// The kind of a transport frame, identified by its tag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Radio packet received over RF (`R`).
    InboundPacket,
    /// Radio packet to transmit over RF, or its echo (`T`).
    OutboundPacket,
    /// Dongle command, or its echo (`C`).
    Command,
    /// Log text from the dongle (`L`).
    LogLine,
}

impl FrameKind {
    /// Map a tag byte to a frame kind. Returns `None` for unrecognized tags.
    pub fn from_tag(tag: u8) -> Option<FrameKind> {
        match tag {
            TAG_RX_PACKET => Some(FrameKind::InboundPacket),
            TAG_TX_PACKET => Some(FrameKind::OutboundPacket),
            TAG_COMMAND => Some(FrameKind::Command),
            TAG_LOG => Some(FrameKind::LogLine),
            _ => None,
        }
    }

    /// The tag byte for this frame kind.
    pub fn tag(&self) -> u8 {
        match self {
            FrameKind::InboundPacket => TAG_RX_PACKET,
            FrameKind::OutboundPacket => TAG_TX_PACKET,
            FrameKind::Command => TAG_COMMAND,
            FrameKind::LogLine => TAG_LOG,
        }
    }
}

/// A complete transport frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFrame {
    /// Frame kind.
    pub kind: FrameKind,
    /// Frame payload (everything after the tag and length bytes).
    pub payload: Vec<u8>,
}

impl TransportFrame {
    /// Create a new frame.
    pub fn new(kind: FrameKind, payload: Vec<u8>) -> Self {
        TransportFrame { kind, payload }
    }

    /// Serialize the frame for transmission: tag, length, payload.
    ///
    /// The length byte counts the entire frame, header bytes included.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(2 + self.payload.len());
        buf.push(self.kind.tag());
        buf.push((self.payload.len() + 2) as u8);
        buf.extend_from_slice(&self.payload);
        buf
    }
}

/// Decoder state between bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// Waiting for a recognized tag byte.
    AwaitingTag,
    /// Tag seen; waiting for the length byte.
    AwaitingLength,
    /// Collecting payload bytes.
    AwaitingPayload,
}

/// A resumable decoder that recovers transport frames from a byte stream.
///
/// The decoder may be fed any slice of the stream - a fragment of a frame,
/// several frames at once, or a single byte - and retains its state across
/// calls. Stray bytes between frames are silently discarded, which is how the
/// stream resynchronizes after garbage.
#[derive(Debug)]
pub struct FrameDecoder {
    state: DecodeState,
    kind: FrameKind,
    payload_len: usize,
    payload: BytesMut,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    /// Create a new decoder, waiting for the first tag byte.
    pub fn new() -> Self {
        FrameDecoder {
            state: DecodeState::AwaitingTag,
            kind: FrameKind::LogLine,
            payload_len: 0,
            payload: BytesMut::with_capacity(XRF_MAX_LEN),
        }
    }

    /// Consume a chunk of the byte stream, returning every frame it completes.
    ///
    /// A declared length below 2 cannot describe a real frame (the length
    /// counts the two header bytes); such frames are dropped and the decoder
    /// returns to scanning for a tag.
    pub fn push(&mut self, data: &[u8]) -> Vec<TransportFrame> {
        let mut frames = Vec::new();
        for &byte in data {
            match self.state {
                DecodeState::AwaitingTag => {
                    if let Some(kind) = FrameKind::from_tag(byte) {
                        self.kind = kind;
                        self.payload.clear();
                        self.state = DecodeState::AwaitingLength;
                    }
                    // Unrecognized byte between frames: discard.
                }

                DecodeState::AwaitingLength => {
                    if byte < 2 {
                        // Malformed length, drop the frame and resynchronize.
                        self.state = DecodeState::AwaitingTag;
                    } else {
                        self.payload_len = (byte - 2) as usize;
                        if self.payload_len == 0 {
                            frames.push(self.take_frame());
                        } else {
                            self.state = DecodeState::AwaitingPayload;
                        }
                    }
                }

                DecodeState::AwaitingPayload => {
                    self.payload.extend_from_slice(&[byte]);
                    if self.payload.len() >= self.payload_len {
                        frames.push(self.take_frame());
                    }
                }
            }
        }
        frames
    }

    /// Emit the completed frame and reset for the next tag.
    fn take_frame(&mut self) -> TransportFrame {
        self.state = DecodeState::AwaitingTag;
        TransportFrame {
            kind: self.kind,
            payload: self.payload.split().to_vec(),
        }
    }
}
