//! XRF Gateway Driver
//!
//! The concurrent half of the XRF stack. Two worker threads and a shared
//! registry sit between the serial dongle and external callers:
//!
//! - [`LinkPump`] owns the serial connection. It feeds received bytes through
//!   the transport [`FrameDecoder`](xrf_protocol::FrameDecoder), pushes
//!   completed frames onto the inbound channel, and drains the outbound
//!   channel onto the wire with pacing between consecutive writes.
//! - [`ProtocolEngine`] consumes the inbound channel, decodes radio packets,
//!   and folds identification and report acks into the [`DeviceRegistry`].
//!   Its outward operations (set channel, identification sweep, parameter
//!   get/set) only enqueue frames or read registry snapshots, so they are safe
//!   to call from any thread.
//! - [`DeviceRegistry`] is the lock-protected map of every fixture heard so
//!   far; records merge field-by-field and never expire.
//!
//! ```text
//! caller ──> ProtocolEngine ──> outbound queue ──> LinkPump ──> serial
//! serial ──> LinkPump ──> inbound queue ──> ProtocolEngine ──> DeviceRegistry
//! ```

mod engine;
mod error;
mod link;
mod pump;
mod registry;

pub use engine::{EngineConfig, ProtocolEngine, PwmLevels};
pub use error::DriverError;
pub use link::{open_dongle, SerialLink, DONGLE_BAUD, DONGLE_PID, DONGLE_VID};
pub use pump::{LinkPump, PumpConfig, PumpHandle};
pub use registry::{DeviceEntry, DeviceRecord, DeviceRegistry, MotionKind};
