//! The link pump thread.
//!
//! Exactly one thread touches the serial connection. Each loop iteration has
//! a read phase (drain link bytes through the frame decoder into the inbound
//! channel) and a write phase (drain the outbound channel onto the link). The
//! dongle firmware cannot absorb back-to-back writes, so a pacing delay is
//! inserted between consecutive outbound frames - between them, never before
//! the first.

use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use tracing::{trace, warn};

use xrf_protocol::{FrameDecoder, TransportFrame};

use crate::link::SerialLink;

/// Size of the read buffer per read call.
const READ_CHUNK: usize = 256;

/// Configuration for the link pump.
#[derive(Debug, Clone)]
pub struct PumpConfig {
    /// Delay between consecutive outbound frame writes.
    pub pacing: Duration,
}

impl Default for PumpConfig {
    fn default() -> Self {
        PumpConfig {
            pacing: Duration::from_millis(100),
        }
    }
}

/// The two queues through which everything else talks to the link.
///
/// Producers push frames to `outbound`; the protocol engine consumes
/// `inbound`. Nothing else may touch the serial connection.
pub struct PumpHandle {
    /// Frames awaiting transmission.
    pub outbound: Sender<TransportFrame>,
    /// Frames received and parsed from the link.
    pub inbound: Receiver<TransportFrame>,
}

/// Spawner for the pump thread.
pub struct LinkPump;

impl LinkPump {
    /// Start the pump thread on `link`.
    ///
    /// The thread runs until every peer of both channels has been dropped,
    /// i.e. until process shutdown.
    pub fn spawn<L: SerialLink + 'static>(
        link: L,
        config: PumpConfig,
    ) -> (PumpHandle, JoinHandle<()>) {
        let (outbound_tx, outbound_rx) = unbounded::<TransportFrame>();
        let (inbound_tx, inbound_rx) = unbounded::<TransportFrame>();

        let thread = thread::Builder::new()
            .name("xrf-pump".to_string())
            .spawn(move || run_pump(link, config, inbound_tx, outbound_rx))
            .expect("failed to spawn pump thread");

        (
            PumpHandle {
                outbound: outbound_tx,
                inbound: inbound_rx,
            },
            thread,
        )
    }
}

/// Pump loop body. The link's read timeout paces the loop when idle.
fn run_pump<L: SerialLink>(
    mut link: L,
    config: PumpConfig,
    inbound: Sender<TransportFrame>,
    outbound: Receiver<TransportFrame>,
) {
    let mut decoder = FrameDecoder::new();
    let mut buf = [0u8; READ_CHUNK];

    loop {
        // Read phase: one bounded read, then frame extraction. Transient
        // errors are logged and the loop carries on.
        match link.read(&mut buf) {
            Ok(0) => {}
            Ok(n) => {
                trace!("read {} bytes from link", n);
                for frame in decoder.push(&buf[..n]) {
                    if inbound.send(frame).is_err() {
                        // Dispatch side is gone; we are shutting down.
                        return;
                    }
                }
            }
            Err(e)
                if e.kind() == io::ErrorKind::TimedOut
                    || e.kind() == io::ErrorKind::WouldBlock
                    || e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => warn!("serial read failed: {}", e),
        }

        // Write phase: drain everything queued, pacing between writes.
        loop {
            match outbound.try_recv() {
                Ok(frame) => {
                    if let Err(e) = link.write_all(&frame.encode()) {
                        warn!("serial write failed: {}", e);
                    }
                    if !outbound.is_empty() {
                        thread::sleep(config.pacing);
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return,
            }
        }
    }
}
