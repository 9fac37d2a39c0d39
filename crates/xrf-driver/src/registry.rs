//! The device registry: last-known state of every fixture heard on the mesh.
//!
//! The registry is written only by the protocol engine's dispatch loop and
//! read by arbitrary caller threads, so it sits behind a single mutex. The
//! rules for the lock are strict: critical sections only mutate fields or
//! copy records, never perform I/O.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

use xrf_protocol::DeviceId;

/// Which motion report variant a fixture last sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionKind {
    /// Simple motion report.
    Simple,
    /// Fancy motion report.
    Fancy,
}

impl std::fmt::Display for MotionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MotionKind::Simple => f.write_str("simple"),
            MotionKind::Fancy => f.write_str("fancy"),
        }
    }
}

/// Last-known state of a single fixture.
///
/// Every field is optional: a record is created on first sighting and filled
/// in as packets arrive. Updates merge into the record; a record is never
/// replaced wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeviceRecord {
    /// Model name, mapped from the IDACK model code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Group/channel membership reported by the fixture.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<u8>,
    /// Hop count at last contact.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hop_count: Option<u8>,
    /// Radio channel the gateway was tuned to when the fixture was last heard.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<u8>,
    /// Firmware version (IDACK version byte × 10).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fw_version: Option<u16>,
    /// When the last motion report arrived.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_motion: Option<DateTime<Utc>>,
    /// Which motion variant the last report carried.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_motion_kind: Option<MotionKind>,
}

/// An independent copy of one registry entry, identity attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceEntry {
    /// Fixture identity.
    pub uid: DeviceId,
    /// The fixture's record at snapshot time.
    #[serde(flatten)]
    pub record: DeviceRecord,
}

/// Mapping from fixture identity to last-known state.
///
/// Entries are created lazily on first sighting and never removed.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: Mutex<HashMap<DeviceId, DeviceRecord>>,
}

impl DeviceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        DeviceRegistry {
            devices: Mutex::new(HashMap::new()),
        }
    }

    /// Get-or-create the record for `uid` and apply `update` to it, all under
    /// the lock. `update` must not block.
    pub fn upsert(&self, uid: DeviceId, update: impl FnOnce(&mut DeviceRecord)) {
        let mut devices = self.devices.lock();
        let record = devices.entry(uid).or_default();
        update(record);
    }

    /// Copy of one fixture's record, if it has ever been heard.
    pub fn get(&self, uid: &DeviceId) -> Option<DeviceRecord> {
        self.devices.lock().get(uid).cloned()
    }

    /// Copy every record out of the registry, sorted by identity.
    ///
    /// The returned entries are fully independent of the registry; later
    /// mutations are never observable through them.
    pub fn snapshot(&self) -> Vec<DeviceEntry> {
        let mut entries: Vec<DeviceEntry> = {
            let devices = self.devices.lock();
            devices
                .iter()
                .map(|(uid, record)| DeviceEntry {
                    uid: *uid,
                    record: record.clone(),
                })
                .collect()
        };
        entries.sort_by_key(|entry| entry.uid);
        entries
    }

    /// Number of fixtures ever heard.
    pub fn len(&self) -> usize {
        self.devices.lock().len()
    }

    /// Whether no fixture has been heard yet.
    pub fn is_empty(&self) -> bool {
        self.devices.lock().is_empty()
    }
}
