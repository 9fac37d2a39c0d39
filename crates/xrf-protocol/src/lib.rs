//! XRF Radio Protocol
//!
//! This crate provides types and codecs for the XRF low-power mesh radio
//! protocol spoken between a host, a USB serial dongle, and networked lighting
//! fixtures. Two framings are layered on the serial link:
//!
//! - **Transport frames** (host ↔ dongle): a one-byte tag identifying the
//!   frame kind, a one-byte length, and a payload. See [`FrameDecoder`].
//! - **Radio packets** (carried inside transport frames): the mesh-level
//!   message with a bit-packed header, hop count, broadcast or unicast
//!   addressing, and parameter value bytes. See [`decode_radio_packet`].
//!
//! Everything here is pure and I/O-free; the serial link and the concurrent
//! driver live in `xrf-driver`.
//!
//! # Example
//!
//! ```rust,ignore
//! use xrf_protocol::{decode_radio_packet, encode_get_parameter, Parameter, Target};
//!
//! // Ask group 255 for its PWM levels
//! let bytes = encode_get_parameter(Parameter::Pwm, Target::Group(0xFF), 0);
//!
//! // Parse a packet received from the dongle
//! let packet = decode_radio_packet(&received)?;
//! ```

mod codec;
mod command;
mod constants;
mod error;
mod frame;
mod packet;

pub use codec::*;
pub use command::*;
pub use constants::*;
pub use error::*;
pub use frame::*;
pub use packet::*;
