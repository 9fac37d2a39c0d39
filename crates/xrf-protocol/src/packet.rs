//! Radio packet types.

use std::fmt;

use crate::constants::*;
use crate::error::ProtocolError;

/// The 8-byte identity of a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(pub [u8; UID_LEN]);

impl DeviceId {
    /// Create a new identity from bytes.
    pub fn new(bytes: [u8; UID_LEN]) -> Self {
        DeviceId(bytes)
    }

    /// Create from a slice. Returns `None` if the slice is the wrong length.
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() == UID_LEN {
            let mut bytes = [0u8; UID_LEN];
            bytes.copy_from_slice(slice);
            Some(DeviceId(bytes))
        } else {
            None
        }
    }

    /// Parse a lowercase/uppercase hex string (16 digits).
    pub fn from_hex(s: &str) -> Result<Self, ProtocolError> {
        let bytes = hex::decode(s).map_err(|_| ProtocolError::InvalidUid(s.to_string()))?;
        DeviceId::from_slice(&bytes).ok_or_else(|| ProtocolError::InvalidUid(s.to_string()))
    }

    /// Get the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; UID_LEN] {
        &self.0
    }

    /// Render as a lowercase hex string, the external form of an identity.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl AsRef<[u8]> for DeviceId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// Identities cross the API boundary as lowercase hex strings.
impl serde::Serialize for DeviceId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for DeviceId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        DeviceId::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Radio-level message types (bits 6-4 of the header byte).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    /// Request for identification and capabilities.
    Id,
    /// Ack with UID and capabilities.
    IdAck,
    /// Request to get a parameter.
    Get,
    /// Ack with a parameter value.
    GetAck,
    /// Set a parameter.
    Set,
    /// Ack confirming a parameter set.
    SetAck,
    /// Asynchronous parameter report.
    Report,
    /// Asynchronous parameter report with the origin UID appended.
    ReportAck,
}

impl MessageType {
    /// Map a 3-bit type code to a message type. Only the low three bits are
    /// significant.
    pub fn from_code(code: u8) -> MessageType {
        match code & 0x07 {
            XRF_TYPE_ID => MessageType::Id,
            XRF_TYPE_IDACK => MessageType::IdAck,
            XRF_TYPE_GET => MessageType::Get,
            XRF_TYPE_GETACK => MessageType::GetAck,
            XRF_TYPE_SET => MessageType::Set,
            XRF_TYPE_SETACK => MessageType::SetAck,
            XRF_TYPE_REPORT => MessageType::Report,
            _ => MessageType::ReportAck,
        }
    }

    /// The wire code for this type.
    pub fn code(&self) -> u8 {
        match self {
            MessageType::Id => XRF_TYPE_ID,
            MessageType::IdAck => XRF_TYPE_IDACK,
            MessageType::Get => XRF_TYPE_GET,
            MessageType::GetAck => XRF_TYPE_GETACK,
            MessageType::Set => XRF_TYPE_SET,
            MessageType::SetAck => XRF_TYPE_SETACK,
            MessageType::Report => XRF_TYPE_REPORT,
            MessageType::ReportAck => XRF_TYPE_REPORTACK,
        }
    }

    /// Human-readable name, for diagnostics only.
    pub fn name(&self) -> &'static str {
        match self {
            MessageType::Id => "ID Request",
            MessageType::IdAck => "ID Ack",
            MessageType::Get => "Get Param",
            MessageType::GetAck => "Get Ack",
            MessageType::Set => "Set Param",
            MessageType::SetAck => "Set Ack",
            MessageType::Report => "Report Param",
            MessageType::ReportAck => "Report Ack",
        }
    }

    /// Whether this message carries the origin fixture's UID in its payload.
    pub fn carries_origin_uid(&self) -> bool {
        matches!(self, MessageType::IdAck | MessageType::ReportAck)
    }
}

/// Parameter ids (bits 3-0 of the header byte).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    /// Motion - simple.
    MotionSimple,
    /// Motion - fancy.
    MotionFancy,
    /// Ambient light measurement.
    Light,
    /// Temperatures.
    Temperature,
    /// Power status.
    PowerStatus,
    /// Instantaneous PWM levels.
    Pwm,
    /// Instantaneous PWM levels (deprecated).
    PwmDeprecated,
    /// Switch contact closures.
    Switch,
    /// Motion timeout.
    MotionTimeout,
    /// Self test.
    SelfTest,
    /// Group/channel membership.
    Group,
    /// Total service times.
    ServiceTimes,
    /// Fader.
    Fader,
    /// Local enables.
    LocalEnables,
    /// Report enables.
    ReportEnables,
    /// Extended parameter; the real sub-id is the first value byte.
    Extended,
}

impl Parameter {
    /// Map a 4-bit parameter code to a parameter. Only the low four bits are
    /// significant.
    pub fn from_code(code: u8) -> Parameter {
        match code & XRF_PARAM_MASK {
            XRF_PARAM_MOTIONSIMPLE => Parameter::MotionSimple,
            XRF_PARAM_MOTIONFANCY => Parameter::MotionFancy,
            XRF_PARAM_LIGHT => Parameter::Light,
            XRF_PARAM_TEMP => Parameter::Temperature,
            XRF_PARAM_PWRSTAT => Parameter::PowerStatus,
            XRF_PARAM_IPWM => Parameter::Pwm,
            XRF_PARAM_IPWMD => Parameter::PwmDeprecated,
            XRF_PARAM_SWITCH => Parameter::Switch,
            XRF_PARAM_MOTIONTIME => Parameter::MotionTimeout,
            XRF_PARAM_SELFTEST => Parameter::SelfTest,
            XRF_PARAM_GROUP => Parameter::Group,
            XRF_PARAM_SVC_TIMES => Parameter::ServiceTimes,
            XRF_PARAM_FADER => Parameter::Fader,
            XRF_PARAM_LOCALEN => Parameter::LocalEnables,
            XRF_PARAM_REPORTEN => Parameter::ReportEnables,
            _ => Parameter::Extended,
        }
    }

    /// The wire code for this parameter.
    pub fn code(&self) -> u8 {
        match self {
            Parameter::MotionSimple => XRF_PARAM_MOTIONSIMPLE,
            Parameter::MotionFancy => XRF_PARAM_MOTIONFANCY,
            Parameter::Light => XRF_PARAM_LIGHT,
            Parameter::Temperature => XRF_PARAM_TEMP,
            Parameter::PowerStatus => XRF_PARAM_PWRSTAT,
            Parameter::Pwm => XRF_PARAM_IPWM,
            Parameter::PwmDeprecated => XRF_PARAM_IPWMD,
            Parameter::Switch => XRF_PARAM_SWITCH,
            Parameter::MotionTimeout => XRF_PARAM_MOTIONTIME,
            Parameter::SelfTest => XRF_PARAM_SELFTEST,
            Parameter::Group => XRF_PARAM_GROUP,
            Parameter::ServiceTimes => XRF_PARAM_SVC_TIMES,
            Parameter::Fader => XRF_PARAM_FADER,
            Parameter::LocalEnables => XRF_PARAM_LOCALEN,
            Parameter::ReportEnables => XRF_PARAM_REPORTEN,
            Parameter::Extended => XRF_PARAM_EXTENDED,
        }
    }

    /// Human-readable name, for diagnostics only.
    pub fn name(&self) -> &'static str {
        match self {
            Parameter::MotionSimple => "Motion Simple",
            Parameter::MotionFancy => "Motion Fancy",
            Parameter::Light => "Ambient Light Level",
            Parameter::Temperature => "Temperature",
            Parameter::PowerStatus => "Power Status",
            Parameter::Pwm => "PWM Levels",
            Parameter::PwmDeprecated => "Instantaneous PWM",
            Parameter::Switch => "Switch Closures",
            Parameter::MotionTimeout => "Motion Timeout",
            Parameter::SelfTest => "Self Test",
            Parameter::Group => "Group/channel",
            Parameter::ServiceTimes => "Operating Lifetime Info",
            Parameter::Fader => "Fader",
            Parameter::LocalEnables => "Mode Enables",
            Parameter::ReportEnables => "Report Enables",
            Parameter::Extended => "Extended Parameter",
        }
    }
}

/// Addressing target for an outgoing radio packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Broadcast to a group (0xFF = all groups on the channel).
    Group(u8),
    /// Unicast to a single fixture.
    Device(DeviceId),
}

/// A decoded radio packet.
///
/// This is a purely structural view of the bytes inside an `R`/`T` transport
/// frame. For IDACK and REPORTACK packets the reporting fixture's UID is
/// split out as `origin`; `value` holds the bytes that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioPacket {
    /// Declared size: number of bytes following the size byte itself.
    pub size: u8,
    /// Whether the unicast header bit was set.
    pub unicast: bool,
    /// Message type from the header.
    pub msg_type: MessageType,
    /// Parameter id from the header.
    pub param: Parameter,
    /// Remaining hop budget when the packet was received.
    pub hop: u8,
    /// Group byte (broadcast packets only).
    pub group: Option<u8>,
    /// Unicast destination (unicast packets only).
    pub target: Option<DeviceId>,
    /// Reporting fixture's UID (IDACK/REPORTACK only).
    pub origin: Option<DeviceId>,
    /// Parameter value bytes.
    pub value: Vec<u8>,
}

/// Map a model code from an IDACK packet to the fixture's model name.
///
/// Unknown codes render as their decimal value.
pub fn model_name(code: u8) -> String {
    match code {
        0 => "Athena".to_string(),
        1 => "AthenaX".to_string(),
        2 => "Artemis".to_string(),
        4 => "Artemis XL".to_string(),
        6 => "USB Dongle".to_string(),
        other => other.to_string(),
    }
}
