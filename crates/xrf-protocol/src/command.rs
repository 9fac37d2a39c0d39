//! Commands addressed to the dongle itself.

use crate::constants::*;
use crate::frame::{FrameKind, TransportFrame};

/// Commands the host can send to the dongle (as opposed to radio packets the
/// dongle transmits on the host's behalf).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DongleCommand {
    /// Request the dongle's info string; arrives back as a log frame.
    RequestInfo,

    /// Request the dongle's UID string; arrives back as a log frame.
    RequestUid,

    /// Tune the radio to a channel (stairwell number).
    SetChannel(u8),

    /// Enable or disable forwarding of received RF packets to the host.
    EnableRx(bool),

    /// Enable or disable mesh forwarding by the dongle.
    EnableMesh(bool),

    /// Enable or disable the dongle transmitting its own reports via RF.
    EnableReport(bool),

    /// Set the dongle's log level.
    SetLogLevel(u8),

    /// Put the radio into test mode (CW for power calibration).
    TestMode(u8),
}

impl DongleCommand {
    /// Encode the command: opcode byte followed by its arguments.
    pub fn encode(&self) -> Vec<u8> {
        match *self {
            DongleCommand::RequestInfo => vec![UCMD_INFO],
            DongleCommand::RequestUid => vec![UCMD_UID],
            DongleCommand::SetChannel(channel) => vec![UCMD_CHANNEL, channel],
            DongleCommand::EnableRx(on) => vec![UCMD_ENRX, on as u8],
            DongleCommand::EnableMesh(on) => vec![UCMD_ENMESH, on as u8],
            DongleCommand::EnableReport(on) => vec![UCMD_ENRPT, on as u8],
            DongleCommand::SetLogLevel(level) => vec![UCMD_LOGLEVEL, level],
            DongleCommand::TestMode(mode) => vec![UCMD_TESTMODE, mode],
        }
    }

    /// Wrap the command as a `C` transport frame ready for the serial link.
    pub fn into_frame(self) -> TransportFrame {
        TransportFrame::new(FrameKind::Command, self.encode())
    }
}
