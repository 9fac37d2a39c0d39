//! Radio packet encoding and decoding.
//!
//! ## Packet Format
//!
//! | Field  | Size (bytes) | Description                                      |
//! |--------|--------------|--------------------------------------------------|
//! | size   | 1            | Number of bytes following the size byte itself.  |
//! | header | 1            | bit7 unicast, bits6-4 type, bits3-0 parameter.   |
//! | hop    | 1            | Hop budget / hop count.                          |
//! | addr   | 1 or 8       | Group byte (broadcast) or destination UID.       |
//! | value  | rest         | Parameter value bytes.                           |
//!
//! IDACK and REPORTACK packets are broadcast-addressed but carry the
//! reporting fixture's 8-byte UID at the front of the value area; IDACK
//! additionally carries a firmware-version byte (tenths, so ×10 for the real
//! version) and a model code.
//!
//! The encoders fix up the size byte after assembly (`total length − 1`);
//! the receiving firmware misframes if this is off by even one byte.

use crate::constants::*;
use crate::error::ProtocolError;
use crate::packet::{DeviceId, MessageType, Parameter, RadioPacket, Target};

// ============================================================================
// Encoding Functions
// ============================================================================

/// Pack the header byte from its three fields.
fn encode_header(msg_type: MessageType, param_code: u8, unicast: bool) -> u8 {
    let mut header = msg_type.code() << XRF_TYPE_SHIFT;
    header |= param_code & XRF_PARAM_MASK;
    if unicast {
        header |= XRF_UNICAST;
    }
    header
}

/// Append the addressing field: group byte or 8-byte destination UID.
fn push_target(buf: &mut Vec<u8>, target: Target) {
    match target {
        Target::Group(group) => buf.push(group),
        Target::Device(uid) => buf.extend_from_slice(uid.as_bytes()),
    }
}

/// Build a broadcast identification request for every fixture in `group`.
pub fn encode_identify_all(group: u8, hops: u8) -> Vec<u8> {
    let header = encode_header(MessageType::Id, 0, false);
    vec![3, header, hops, group]
}

/// Build a get-parameter request addressed to a group or a single fixture.
pub fn encode_get_parameter(param: Parameter, target: Target, hops: u8) -> Vec<u8> {
    let unicast = matches!(target, Target::Device(_));
    let mut buf = vec![0, encode_header(MessageType::Get, param.code(), unicast), hops];
    push_target(&mut buf, target);
    buf[0] = (buf.len() - 1) as u8;
    buf
}

/// Build a set-parameter request addressed to a group or a single fixture.
pub fn encode_set_parameter(param: Parameter, target: Target, values: &[u8], hops: u8) -> Vec<u8> {
    let unicast = matches!(target, Target::Device(_));
    let mut buf = vec![0, encode_header(MessageType::Set, param.code(), unicast), hops];
    push_target(&mut buf, target);
    buf.extend_from_slice(values);
    buf[0] = (buf.len() - 1) as u8;
    buf
}

// ============================================================================
// Decoding Functions
// ============================================================================

/// Decode a radio packet from the payload of an `R`/`T` transport frame.
///
/// This is a structural split only; no semantic validation is performed
/// beyond requiring the buffer to contain the fields implied by the header.
pub fn decode_radio_packet(data: &[u8]) -> Result<RadioPacket, ProtocolError> {
    // size + header + hop + at least a group byte
    if data.len() < 4 {
        return Err(ProtocolError::Truncated {
            expected: 4,
            actual: data.len(),
        });
    }

    let size = data[0];
    let header = data[1];
    let hop = data[2];
    let unicast = header & XRF_UNICAST != 0;
    let msg_type = MessageType::from_code((header & XRF_TYPE_MASK) >> XRF_TYPE_SHIFT);
    let param = Parameter::from_code(header & XRF_PARAM_MASK);

    if unicast {
        // 8-byte destination UID replaces the group byte.
        let needed = 3 + UID_LEN;
        if data.len() < needed {
            return Err(ProtocolError::Truncated {
                expected: needed,
                actual: data.len(),
            });
        }
        let target = DeviceId::from_slice(&data[3..3 + UID_LEN]);
        return Ok(RadioPacket {
            size,
            unicast,
            msg_type,
            param,
            hop,
            group: None,
            target,
            origin: None,
            value: data[3 + UID_LEN..].to_vec(),
        });
    }

    let group = data[3];
    let (origin, value) = if msg_type.carries_origin_uid() {
        let needed = 4 + UID_LEN;
        if data.len() < needed {
            return Err(ProtocolError::Truncated {
                expected: needed,
                actual: data.len(),
            });
        }
        (
            DeviceId::from_slice(&data[4..4 + UID_LEN]),
            data[4 + UID_LEN..].to_vec(),
        )
    } else {
        (None, data[4..].to_vec())
    };

    Ok(RadioPacket {
        size,
        unicast,
        msg_type,
        param,
        hop,
        group: Some(group),
        target: None,
        origin,
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const UID: [u8; 8] = [1, 2, 3, 4, 5, 6, 7, 8];

    #[test]
    fn test_identify_all_layout() {
        let bytes = encode_identify_all(XRF_UNIVERSAL_GROUP, 5);
        assert_eq!(bytes, vec![3, XRF_TYPE_ID << XRF_TYPE_SHIFT, 5, 0xFF]);
        // size byte counts everything after itself
        assert_eq!(bytes[0] as usize, bytes.len() - 1);
    }

    #[test]
    fn test_get_parameter_broadcast_round_trip() {
        let bytes = encode_get_parameter(Parameter::Pwm, Target::Group(255), 0);
        let pkt = decode_radio_packet(&bytes).unwrap();
        assert!(!pkt.unicast);
        assert_eq!(pkt.msg_type, MessageType::Get);
        assert_eq!(pkt.param, Parameter::Pwm);
        assert_eq!(pkt.param.code(), 5);
        assert_eq!(pkt.group, Some(255));
        assert!(pkt.value.is_empty());
        assert_eq!(bytes[0] as usize, bytes.len() - 1);
    }

    #[test]
    fn test_get_parameter_unicast_round_trip() {
        let uid = DeviceId::new(UID);
        let bytes = encode_get_parameter(Parameter::Temperature, Target::Device(uid), 3);
        let pkt = decode_radio_packet(&bytes).unwrap();
        assert!(pkt.unicast);
        assert_eq!(pkt.msg_type, MessageType::Get);
        assert_eq!(pkt.param, Parameter::Temperature);
        assert_eq!(pkt.hop, 3);
        assert_eq!(pkt.target, Some(uid));
        assert_eq!(pkt.group, None);
        assert!(pkt.value.is_empty());
    }

    #[test]
    fn test_set_parameter_round_trip() {
        let uid = DeviceId::new(UID);
        let levels = [200, 150, 30, 10];
        let bytes = encode_set_parameter(Parameter::Pwm, Target::Device(uid), &levels, 0);
        assert_eq!(bytes[0] as usize, bytes.len() - 1);

        let pkt = decode_radio_packet(&bytes).unwrap();
        assert!(pkt.unicast);
        assert_eq!(pkt.msg_type, MessageType::Set);
        assert_eq!(pkt.target, Some(uid));
        assert_eq!(pkt.value, levels.to_vec());
    }

    #[test]
    fn test_set_parameter_broadcast_values() {
        let bytes = encode_set_parameter(Parameter::Fader, Target::Group(7), &[0x42], 2);
        let pkt = decode_radio_packet(&bytes).unwrap();
        assert_eq!(pkt.group, Some(7));
        assert_eq!(pkt.hop, 2);
        assert_eq!(pkt.value, vec![0x42]);
    }

    #[test]
    fn test_decode_idack_extracts_origin() {
        // size, header(IDACK), hop, group, uid, fw version byte, model code
        let mut payload = vec![13, XRF_TYPE_IDACK << XRF_TYPE_SHIFT, 2, 1];
        payload.extend_from_slice(&UID);
        payload.push(21); // fw version in tenths
        payload.push(0); // Athena

        let pkt = decode_radio_packet(&payload).unwrap();
        assert_eq!(pkt.msg_type, MessageType::IdAck);
        assert_eq!(pkt.group, Some(1));
        assert_eq!(pkt.hop, 2);
        assert_eq!(pkt.origin, Some(DeviceId::new(UID)));
        assert_eq!(pkt.value, vec![21, 0]);
    }

    #[test]
    fn test_decode_short_buffer() {
        let err = decode_radio_packet(&[3, 0x10]).unwrap_err();
        assert_eq!(err, ProtocolError::Truncated { expected: 4, actual: 2 });

        // IDACK that cuts off mid-UID
        let payload = vec![13, XRF_TYPE_IDACK << XRF_TYPE_SHIFT, 2, 1, 9, 9, 9];
        assert!(matches!(
            decode_radio_packet(&payload),
            Err(ProtocolError::Truncated { expected: 12, .. })
        ));

        // Unicast packet that cuts off mid-destination
        let payload = vec![5, XRF_UNICAST | (XRF_TYPE_GET << XRF_TYPE_SHIFT), 0, 1, 2];
        assert!(matches!(
            decode_radio_packet(&payload),
            Err(ProtocolError::Truncated { expected: 11, .. })
        ));
    }
}
