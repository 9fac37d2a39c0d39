//! The protocol engine.
//!
//! One dispatch thread consumes the inbound frame queue and folds radio
//! packets into the registry; the outward-facing operations build frames and
//! push them onto the outbound queue. Nothing here blocks while holding the
//! registry lock, and nothing but [`identify_all`](ProtocolEngine::identify_all)
//! blocks the caller at all.
//!
//! Two deliberate limitations carry over from the protocol contract:
//!
//! - `identify_all` is a time-boxed sweep, not a correlated request/response
//!   exchange. It waits out a fixed collection window and returns whatever
//!   the registry holds.
//! - `get_parameter` has no synchronous result. The eventual GETACK (if any)
//!   arrives through the dispatch loop and updates the registry; callers poll
//!   the registry afterwards.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::Utc;
use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, warn};

use xrf_protocol::{
    decode_radio_packet, encode_get_parameter, encode_identify_all, encode_set_parameter,
    model_name, DeviceId, DongleCommand, FrameKind, MessageType, Parameter, RadioPacket, Target,
    TransportFrame,
};

use crate::error::DriverError;
use crate::pump::PumpHandle;
use crate::registry::{DeviceEntry, DeviceRegistry, MotionKind};

/// Configuration for the protocol engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Channel the gateway starts on.
    pub initial_channel: u8,
    /// Hop budget stamped on transmitted packets.
    pub default_hops: u8,
    /// How long an identification sweep collects replies.
    pub discovery_window: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            initial_channel: 1,
            default_hops: 0,
            discovery_window: Duration::from_secs(5),
        }
    }
}

/// The four PWM dimming levels a driver fixture holds.
///
/// Each level is 0-255 and is applied according to occupancy and power
/// source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmLevels {
    /// Level while occupied, on mains power.
    pub occupied_mains: u8,
    /// Level while occupied, on battery.
    pub occupied_battery: u8,
    /// Level while unoccupied, on mains power.
    pub unoccupied_mains: u8,
    /// Level while unoccupied, on battery.
    pub unoccupied_battery: u8,
}

impl PwmLevels {
    /// Wire encoding: the four levels in order.
    pub fn to_bytes(self) -> [u8; 4] {
        [
            self.occupied_mains,
            self.occupied_battery,
            self.unoccupied_mains,
            self.unoccupied_battery,
        ]
    }
}

/// Protocol logic between the link pump and external callers.
///
/// All methods are safe to call concurrently with each other and with the
/// dispatch loop: they only enqueue frames or read registry snapshots.
pub struct ProtocolEngine {
    outbound: Sender<TransportFrame>,
    registry: Arc<DeviceRegistry>,
    channel: AtomicU8,
    default_hops: AtomicU8,
    discovery_window: Duration,
}

impl ProtocolEngine {
    /// Create the engine and start its dispatch thread on the pump's inbound
    /// queue.
    pub fn spawn(
        pump: PumpHandle,
        registry: Arc<DeviceRegistry>,
        config: EngineConfig,
    ) -> (Arc<ProtocolEngine>, JoinHandle<()>) {
        let engine = Arc::new(ProtocolEngine {
            outbound: pump.outbound,
            registry,
            channel: AtomicU8::new(config.initial_channel),
            default_hops: AtomicU8::new(config.default_hops),
            discovery_window: config.discovery_window,
        });

        let dispatch_engine = engine.clone();
        let inbound = pump.inbound;
        let thread = thread::Builder::new()
            .name("xrf-dispatch".to_string())
            .spawn(move || dispatch_engine.run_dispatch(inbound))
            .expect("failed to spawn dispatch thread");

        (engine, thread)
    }

    /// Dispatch loop: blocks on the inbound queue until the pump side closes.
    fn run_dispatch(&self, inbound: Receiver<TransportFrame>) {
        while let Ok(frame) = inbound.recv() {
            self.handle_frame(frame);
        }
        debug!("inbound queue closed, dispatch exiting");
    }

    fn handle_frame(&self, frame: TransportFrame) {
        match frame.kind {
            FrameKind::LogLine => {
                let text = String::from_utf8_lossy(&frame.payload);
                debug!("dongle: {}", text.trim_end_matches(['\r', '\n']));
            }
            FrameKind::OutboundPacket => {
                debug!("tx echo: {}", hex::encode(&frame.payload));
            }
            FrameKind::Command => {
                debug!("command echo: {}", hex::encode(&frame.payload));
            }
            FrameKind::InboundPacket => match decode_radio_packet(&frame.payload) {
                Ok(packet) => self.handle_packet(packet),
                Err(e) => warn!("dropping malformed radio packet: {}", e),
            },
        }
    }

    /// Fold one decoded radio packet into the registry.
    fn handle_packet(&self, packet: RadioPacket) {
        debug!(
            "rx: type={}, param={}, hop={}, group={:?}",
            packet.msg_type.name(),
            packet.param.name(),
            packet.hop,
            packet.group
        );

        match packet.msg_type {
            MessageType::Id => {
                // Someone else is sweeping the channel; nothing to record.
            }

            MessageType::IdAck => {
                let Some(uid) = packet.origin else {
                    warn!("idack without origin uid");
                    return;
                };
                // value = [fw version in tenths, model code]
                if packet.value.len() < 2 {
                    warn!("idack from {} missing version/model bytes", uid);
                    return;
                }
                let fw_version = packet.value[0] as u16 * 10;
                let model = model_name(packet.value[1]);
                let channel = self.channel.load(Ordering::Relaxed);
                debug!("identified fixture {} ({})", uid, model);

                self.registry.upsert(uid, |rec| {
                    rec.model = Some(model);
                    rec.group = packet.group;
                    rec.hop_count = Some(packet.hop);
                    rec.channel = Some(channel);
                    rec.fw_version = Some(fw_version);
                });
            }

            MessageType::ReportAck => {
                let Some(uid) = packet.origin else {
                    warn!("reportack without origin uid");
                    return;
                };
                let motion = match packet.param {
                    Parameter::MotionSimple => Some(MotionKind::Simple),
                    Parameter::MotionFancy => Some(MotionKind::Fancy),
                    _ => None,
                };

                self.registry.upsert(uid, |rec| {
                    rec.group = packet.group;
                    rec.hop_count = Some(packet.hop);
                    if let Some(kind) = motion {
                        rec.last_motion = Some(Utc::now());
                        rec.last_motion_kind = Some(kind);
                    }
                });
            }

            other => {
                debug!(
                    "unsupported message type {} ({})",
                    other.code(),
                    other.name()
                );
            }
        }
    }

    /// Queue a frame for transmission. The pump outliving the engine is the
    /// normal case; the reverse only happens during shutdown.
    fn send_frame(&self, frame: TransportFrame) {
        if self.outbound.send(frame).is_err() {
            warn!("link pump is gone; dropping outbound frame");
        }
    }

    fn send_packet(&self, bytes: Vec<u8>) {
        self.send_frame(TransportFrame::new(FrameKind::OutboundPacket, bytes));
    }

    // ------------------------------------------------------------------
    // Channel and hop state
    // ------------------------------------------------------------------

    /// Tune the dongle to `channel`. Future IDACKs are recorded against the
    /// new channel.
    pub fn set_channel(&self, channel: u8) {
        self.channel.store(channel, Ordering::Relaxed);
        self.send_frame(DongleCommand::SetChannel(channel).into_frame());
    }

    /// The channel the gateway is currently tuned to.
    pub fn channel(&self) -> u8 {
        self.channel.load(Ordering::Relaxed)
    }

    /// Set the hop budget stamped on transmitted packets.
    pub fn set_default_hops(&self, hops: u8) {
        self.default_hops.store(hops, Ordering::Relaxed);
    }

    // ------------------------------------------------------------------
    // Discovery and registry access
    // ------------------------------------------------------------------

    /// Broadcast an identification request to `group`, wait out the
    /// collection window, and return a snapshot of everything known.
    ///
    /// This blocks the caller for the full window; replies that arrive later
    /// still land in the registry and show up in the next snapshot.
    pub fn identify_all(&self, group: u8) -> Vec<DeviceEntry> {
        let hops = self.default_hops.load(Ordering::Relaxed);
        self.send_packet(encode_identify_all(group, hops));
        thread::sleep(self.discovery_window);
        self.registry.snapshot()
    }

    /// Snapshot of every known fixture.
    pub fn devices(&self) -> Vec<DeviceEntry> {
        self.registry.snapshot()
    }

    /// Look up a single fixture by identity.
    pub fn device(&self, uid: &DeviceId) -> Result<DeviceEntry, DriverError> {
        self.registry
            .get(uid)
            .map(|record| DeviceEntry { uid: *uid, record })
            .ok_or_else(|| DriverError::DeviceNotFound(uid.to_hex()))
    }

    // ------------------------------------------------------------------
    // Parameter access
    // ------------------------------------------------------------------

    /// Request a parameter from a group or fixture.
    ///
    /// Fire-and-forget: the reply (if any) arrives asynchronously and updates
    /// the registry.
    pub fn get_parameter(&self, param: Parameter, target: Target) {
        let hops = self.default_hops.load(Ordering::Relaxed);
        self.send_packet(encode_get_parameter(param, target, hops));
    }

    /// Set a parameter on a group or fixture. Fire-and-forget.
    pub fn set_parameter(&self, param: Parameter, target: Target, values: &[u8]) {
        let hops = self.default_hops.load(Ordering::Relaxed);
        self.send_packet(encode_set_parameter(param, target, values, hops));
    }

    /// Set the four PWM dimming levels on a group or fixture.
    pub fn set_pwm_levels(&self, target: Target, levels: PwmLevels) {
        self.set_parameter(Parameter::Pwm, target, &levels.to_bytes());
    }

    /// Request the PWM dimming levels from a group or fixture.
    pub fn request_pwm_levels(&self, target: Target) {
        self.get_parameter(Parameter::Pwm, target);
    }

    // ------------------------------------------------------------------
    // Dongle control
    // ------------------------------------------------------------------

    /// Send a raw command to the dongle.
    pub fn dongle_command(&self, command: DongleCommand) {
        self.send_frame(command.into_frame());
    }

    /// Enable or disable forwarding of received RF packets to the host.
    pub fn enable_rx(&self, enable: bool) {
        self.dongle_command(DongleCommand::EnableRx(enable));
    }

    /// Enable or disable mesh forwarding by the dongle.
    pub fn enable_mesh(&self, enable: bool) {
        self.dongle_command(DongleCommand::EnableMesh(enable));
    }

    /// Enable or disable the dongle's own RF reports.
    pub fn enable_report(&self, enable: bool) {
        self.dongle_command(DongleCommand::EnableReport(enable));
    }

    /// Set the dongle's log level.
    pub fn set_dongle_log_level(&self, level: u8) {
        self.dongle_command(DongleCommand::SetLogLevel(level));
    }

    /// Put the dongle's radio into test mode.
    pub fn set_test_mode(&self, mode: u8) {
        self.dongle_command(DongleCommand::TestMode(mode));
    }

    /// Ask the dongle for its info string (arrives as a log frame).
    pub fn request_dongle_info(&self) {
        self.dongle_command(DongleCommand::RequestInfo);
    }

    /// Ask the dongle for its UID string (arrives as a log frame).
    pub fn request_dongle_uid(&self) {
        self.dongle_command(DongleCommand::RequestUid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use xrf_protocol::{XRF_TYPE_IDACK, XRF_TYPE_REPORTACK, XRF_TYPE_SHIFT, XRF_UNICAST};

    const UID: [u8; 8] = [1, 2, 3, 4, 5, 6, 7, 8];

    struct Harness {
        engine: Arc<ProtocolEngine>,
        registry: Arc<DeviceRegistry>,
        inbound_tx: Sender<TransportFrame>,
        outbound_rx: Receiver<TransportFrame>,
        dispatch: JoinHandle<()>,
    }

    fn spawn_engine(config: EngineConfig) -> Harness {
        let (outbound_tx, outbound_rx) = unbounded();
        let (inbound_tx, inbound_rx) = unbounded();
        let registry = Arc::new(DeviceRegistry::new());
        let (engine, dispatch) = ProtocolEngine::spawn(
            PumpHandle {
                outbound: outbound_tx,
                inbound: inbound_rx,
            },
            registry.clone(),
            config,
        );
        Harness {
            engine,
            registry,
            inbound_tx,
            outbound_rx,
            dispatch,
        }
    }

    /// Feed frames through dispatch and wait for it to drain them all.
    fn feed_and_settle(h: Harness, frames: Vec<TransportFrame>) -> (Arc<DeviceRegistry>, Arc<ProtocolEngine>) {
        for frame in frames {
            h.inbound_tx.send(frame).unwrap();
        }
        drop(h.inbound_tx);
        h.dispatch.join().unwrap();
        drop(h.outbound_rx);
        (h.registry, h.engine)
    }

    fn idack_frame(group: u8, hop: u8, version: u8, model: u8) -> TransportFrame {
        let mut payload = vec![13, XRF_TYPE_IDACK << XRF_TYPE_SHIFT, hop, group];
        payload.extend_from_slice(&UID);
        payload.push(version);
        payload.push(model);
        TransportFrame::new(FrameKind::InboundPacket, payload)
    }

    fn reportack_frame(group: u8, hop: u8, param: u8) -> TransportFrame {
        let mut payload = vec![11, (XRF_TYPE_REPORTACK << XRF_TYPE_SHIFT) | param, hop, group];
        payload.extend_from_slice(&UID);
        TransportFrame::new(FrameKind::InboundPacket, payload)
    }

    #[test]
    fn test_idack_populates_registry() {
        let h = spawn_engine(EngineConfig::default());
        let (registry, _engine) = feed_and_settle(h, vec![idack_frame(1, 2, 21, 0)]);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 1);
        let entry = &snapshot[0];
        assert_eq!(entry.uid.to_hex(), "0102030405060708");
        assert_eq!(entry.record.model.as_deref(), Some("Athena"));
        assert_eq!(entry.record.hop_count, Some(2));
        assert_eq!(entry.record.group, Some(1));
        assert_eq!(entry.record.fw_version, Some(210));
        assert_eq!(entry.record.channel, Some(1));
    }

    #[test]
    fn test_reportack_merges_into_existing_record() {
        let h = spawn_engine(EngineConfig::default());
        let frames = vec![
            idack_frame(1, 2, 21, 0),
            // param 0 = motion simple
            reportack_frame(1, 3, 0),
        ];
        let (registry, _engine) = feed_and_settle(h, frames);

        let record = registry.get(&DeviceId::new(UID)).unwrap();
        // Identification fields survive the report.
        assert_eq!(record.model.as_deref(), Some("Athena"));
        assert_eq!(record.fw_version, Some(210));
        // Report fields were merged in.
        assert_eq!(record.hop_count, Some(3));
        assert!(record.last_motion.is_some());
        assert_eq!(record.last_motion_kind, Some(MotionKind::Simple));
    }

    #[test]
    fn test_fancy_motion_variant() {
        let h = spawn_engine(EngineConfig::default());
        let (registry, _engine) = feed_and_settle(h, vec![reportack_frame(4, 1, 1)]);

        let record = registry.get(&DeviceId::new(UID)).unwrap();
        assert_eq!(record.last_motion_kind, Some(MotionKind::Fancy));
        assert_eq!(record.group, Some(4));
        // Never identified, so no model.
        assert_eq!(record.model, None);
    }

    #[test]
    fn test_malformed_and_unsupported_frames_are_survivable() {
        let h = spawn_engine(EngineConfig::default());
        let frames = vec![
            // Truncated radio packet
            TransportFrame::new(FrameKind::InboundPacket, vec![3, 0x10]),
            // GETACK: supported wire type, no registry effect
            TransportFrame::new(
                FrameKind::InboundPacket,
                vec![4, 3 << XRF_TYPE_SHIFT, 0, 1, 0xAA],
            ),
            // Unicast packet cut off mid-uid
            TransportFrame::new(
                FrameKind::InboundPacket,
                vec![5, XRF_UNICAST | (2 << XRF_TYPE_SHIFT), 0, 1, 2],
            ),
            // Dongle log line and echoes
            TransportFrame::new(FrameKind::LogLine, b"booted\r\n".to_vec()),
            TransportFrame::new(FrameKind::Command, vec![2, 4]),
            // The loop is still alive: this one must land
            idack_frame(1, 2, 21, 0),
        ];
        let (registry, _engine) = feed_and_settle(h, frames);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_identify_all_empty_returns_after_window() {
        let h = spawn_engine(EngineConfig {
            discovery_window: Duration::from_millis(50),
            ..Default::default()
        });

        let start = std::time::Instant::now();
        let devices = h.engine.identify_all(0xFF);
        assert!(devices.is_empty());
        assert!(start.elapsed() >= Duration::from_millis(50));

        // The broadcast ID request was queued before the wait.
        let frame = h.outbound_rx.try_recv().unwrap();
        assert_eq!(frame.kind, FrameKind::OutboundPacket);
        assert_eq!(frame.payload, encode_identify_all(0xFF, 0));
    }

    #[test]
    fn test_set_channel_updates_state_and_queues_command() {
        let h = spawn_engine(EngineConfig::default());
        h.engine.set_channel(7);
        assert_eq!(h.engine.channel(), 7);

        let frame = h.outbound_rx.try_recv().unwrap();
        assert_eq!(frame.kind, FrameKind::Command);
        assert_eq!(frame.payload, DongleCommand::SetChannel(7).encode());
    }

    #[test]
    fn test_idack_after_set_channel_records_new_channel() {
        let h = spawn_engine(EngineConfig::default());
        h.engine.set_channel(9);
        let (registry, _engine) = feed_and_settle(h, vec![idack_frame(1, 2, 21, 0)]);
        assert_eq!(registry.get(&DeviceId::new(UID)).unwrap().channel, Some(9));
    }

    #[test]
    fn test_pwm_levels_encoding() {
        let h = spawn_engine(EngineConfig::default());
        let uid = DeviceId::new(UID);
        h.engine.set_pwm_levels(
            Target::Device(uid),
            PwmLevels {
                occupied_mains: 200,
                occupied_battery: 150,
                unoccupied_mains: 30,
                unoccupied_battery: 10,
            },
        );

        let frame = h.outbound_rx.try_recv().unwrap();
        assert_eq!(frame.kind, FrameKind::OutboundPacket);
        let packet = decode_radio_packet(&frame.payload).unwrap();
        assert_eq!(packet.msg_type, MessageType::Set);
        assert_eq!(packet.param, Parameter::Pwm);
        assert_eq!(packet.target, Some(uid));
        assert_eq!(packet.value, vec![200, 150, 30, 10]);
    }

    #[test]
    fn test_device_lookup_not_found() {
        let h = spawn_engine(EngineConfig::default());
        let missing = DeviceId::new([9; 8]);
        assert!(matches!(
            h.engine.device(&missing),
            Err(DriverError::DeviceNotFound(_))
        ));
    }
}
