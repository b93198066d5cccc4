/*!
APU bridge: the audio co-processor's boot-handshake state machine and
its dedicated thread.

Layout:
- `ApuPorts`: the four shared bytes in each direction between CPU and
  APU. Every byte is an atomic cell; this is the only state the two
  threads share.
- `HandshakeEngine`: the pure state machine (NOT_INITIALIZED ->
  INITIALIZED -> EXECUTING, STOPPED orthogonal) with its 64 KiB local
  RAM and transfer cursor. It is synchronous and fully testable without
  a thread: feed it port snapshots, observe events.
- `Apu`: power-up spawns the bridge thread, power-down signals it and
  joins. The stop signal is a crossbeam channel; the EXECUTING wait is
  a bounded `recv_timeout` poll, so a stuck handshake blocks until
  power-down and never times out on its own.

Protocol (cookie classification on each port-0 change):
- 0xCC before initialization: INIT. Transfer address captured from
  ports 2-3; the expected data counter restarts at zero and the block
  anchor is set just past it.
- previous+1, or a fresh 0: DATA. Port 1's byte lands at the cursor.
- block-anchor+4 (a result of 0 wraps to 4): NEW block when port 1 is
  nonzero (address from ports 2-3), END when port 1 is zero (move to
  EXECUTING).
- anything else is a fatal protocol violation: the engine stops, the
  CPU side keeps running against frozen ports.

A snapshot whose port 0 equals the last observed port 0 is treated as
"no change" even if other bytes differ; this conflation is part of the
observed protocol and deliberately preserved.

After INIT/DATA/NEW the bridge echoes the cookie on output port 0; no
echo is ever produced before INITIALIZED is reached, and END is not
echoed.
*/

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam::channel::{Receiver, RecvTimeoutError, Sender, bounded};

use crate::error::ApuProtocolError;

/// APU-local RAM size.
pub const APU_RAM_SIZE: usize = 64 * 1024;

/// Poll interval for the bridge thread's stop checks.
const POLL_INTERVAL: Duration = Duration::from_micros(200);

/// Values the IPL presents on output ports 0/1 at power-up.
pub const READY_PORT0: u8 = 0xAA;
pub const READY_PORT1: u8 = 0xBB;

const INIT_COOKIE: u8 = 0xCC;

// ---------------------------------------------------------------------
// Shared ports
// ---------------------------------------------------------------------

/// The 4+4 shared port bytes. `input` is written by the CPU and read by
/// the APU; `output` the reverse. Each byte is individually atomic,
/// which is all the coordination the protocol needs: the handshake is
/// driven off single-byte transitions of port 0.
#[derive(Debug)]
pub struct ApuPorts {
    input: [AtomicU8; 4],
    output: [AtomicU8; 4],
}

impl Default for ApuPorts {
    fn default() -> Self {
        Self::new()
    }
}

impl ApuPorts {
    pub fn new() -> Self {
        Self {
            input: [const { AtomicU8::new(0) }; 4],
            output: [const { AtomicU8::new(0) }; 4],
        }
    }

    /// CPU-side write to an input port (bus address $2140 + port).
    #[inline]
    pub fn cpu_write(&self, port: u8, value: u8) {
        self.input[(port & 3) as usize].store(value, Ordering::SeqCst);
    }

    /// CPU-side read of an output port.
    #[inline]
    pub fn cpu_read(&self, port: u8) -> u8 {
        self.output[(port & 3) as usize].load(Ordering::SeqCst)
    }

    /// APU-side snapshot of all four input ports.
    #[inline]
    pub fn apu_read_inputs(&self) -> [u8; 4] {
        [
            self.input[0].load(Ordering::SeqCst),
            self.input[1].load(Ordering::SeqCst),
            self.input[2].load(Ordering::SeqCst),
            self.input[3].load(Ordering::SeqCst),
        ]
    }

    /// APU-side write to an output port.
    #[inline]
    pub fn apu_write_output(&self, port: u8, value: u8) {
        self.output[(port & 3) as usize].store(value, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------
// Handshake engine
// ---------------------------------------------------------------------

/// Bridge lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ApuState {
    Stopped,
    NotInitialized,
    Initialized,
    Executing,
}

/// Outcome of one observed port snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeEvent {
    /// Port 0 unchanged (or full snapshot identical): nothing happened.
    NoChange,
    Init,
    Data,
    NewBlock,
    End,
}

impl HandshakeEvent {
    /// INIT/DATA/NEW complete the round-trip with an echo; END and
    /// no-change do not. The bridge additionally requires the engine to
    /// have reached INITIALIZED before any echo is produced.
    #[inline]
    pub fn echoes(self) -> bool {
        matches!(self, HandshakeEvent::Init | HandshakeEvent::Data | HandshakeEvent::NewBlock)
    }
}

/// The pure handshake state machine.
pub struct HandshakeEngine {
    state: ApuState,
    ram: Box<[u8; APU_RAM_SIZE]>,
    cursor: u16,
    last_cookie: u8,
    anchor: u8,
    last_seen: [u8; 4],
}

impl Default for HandshakeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl HandshakeEngine {
    pub fn new() -> Self {
        Self {
            state: ApuState::NotInitialized,
            ram: vec![0u8; APU_RAM_SIZE].into_boxed_slice().try_into().unwrap(),
            cursor: 0,
            last_cookie: 0,
            anchor: 0,
            last_seen: [0; 4],
        }
    }

    #[inline]
    pub fn state(&self) -> ApuState {
        self.state
    }

    #[inline]
    pub fn cursor(&self) -> u16 {
        self.cursor
    }

    /// Read a byte of APU-local RAM (driver/test visibility).
    #[inline]
    pub fn ram(&self, addr: u16) -> u8 {
        self.ram[addr as usize]
    }

    /// Cookie expected to open the next block (NEW/END position).
    #[inline]
    fn block_boundary(&self) -> u8 {
        let b = self.anchor.wrapping_add(4);
        if b == 0 { 4 } else { b }
    }

    /// Process one snapshot of the input ports.
    ///
    /// A fatal classification failure moves the engine to STOPPED and is
    /// returned to the caller; subsequent snapshots are ignored.
    pub fn observe(&mut self, ports: [u8; 4]) -> Result<HandshakeEvent, ApuProtocolError> {
        if self.state == ApuState::Stopped || self.state == ApuState::Executing {
            return Ok(HandshakeEvent::NoChange);
        }
        // Same-data conflation: port 0 equality alone means "no change".
        if ports == self.last_seen || ports[0] == self.last_seen[0] {
            return Ok(HandshakeEvent::NoChange);
        }

        let cookie = ports[0];
        let event = if cookie == INIT_COOKIE && self.state < ApuState::Initialized {
            self.cursor = transfer_address(ports);
            self.state = ApuState::Initialized;
            self.last_cookie = 0;
            self.anchor = 1;
            HandshakeEvent::Init
        } else if cookie == self.last_cookie.wrapping_add(1) || cookie == 0 {
            self.ram[self.cursor as usize] = ports[1];
            self.cursor = self.cursor.wrapping_add(1);
            self.last_cookie = cookie;
            HandshakeEvent::Data
        } else if cookie == self.block_boundary() {
            if ports[1] != 0 {
                self.cursor = transfer_address(ports);
                self.anchor = cookie;
                self.last_cookie = cookie;
                HandshakeEvent::NewBlock
            } else {
                self.state = ApuState::Executing;
                HandshakeEvent::End
            }
        } else {
            let state = self.state;
            self.state = ApuState::Stopped;
            return Err(ApuProtocolError::BadCookie { cookie, ports, state });
        };

        self.last_seen = ports;
        Ok(event)
    }

    /// Halt the engine (power-down path).
    pub fn stop(&mut self) {
        self.state = ApuState::Stopped;
    }
}

/// Transfer target from ports 2 (low) and 3 (high).
#[inline]
fn transfer_address(ports: [u8; 4]) -> u16 {
    (ports[2] as u16) | ((ports[3] as u16) << 8)
}

// ---------------------------------------------------------------------
// Thread wrapper
// ---------------------------------------------------------------------

/// The APU bridge thread handle. Power-up spawns the thread; power-down
/// (or drop) signals it and joins before returning.
pub struct Apu {
    handle: Option<JoinHandle<()>>,
    stop_tx: Option<Sender<()>>,
}

impl Apu {
    /// Start the bridge thread against a shared port pair.
    pub fn power_up(ports: Arc<ApuPorts>) -> Self {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let handle = std::thread::Builder::new()
            .name("apu-bridge".into())
            .spawn(move || bridge_loop(ports, stop_rx))
            .expect("spawn apu bridge thread");
        Self {
            handle: Some(handle),
            stop_tx: Some(stop_tx),
        }
    }

    /// Stop the bridge and block until its thread has quiesced.
    pub fn power_down(&mut self) {
        // Dropping the sender disconnects the channel; the thread
        // observes that at its next poll.
        self.stop_tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Apu {
    fn drop(&mut self) {
        self.power_down();
    }
}

fn bridge_loop(ports: Arc<ApuPorts>, stop_rx: Receiver<()>) {
    // IPL ready signature, presented before any handshake traffic.
    ports.apu_write_output(0, READY_PORT0);
    ports.apu_write_output(1, READY_PORT1);

    let mut engine = HandshakeEngine::new();
    loop {
        if engine.state() != ApuState::Executing {
            let snapshot = ports.apu_read_inputs();
            match engine.observe(snapshot) {
                Ok(event) if event.echoes() && engine.state() >= ApuState::Initialized => {
                    ports.apu_write_output(0, snapshot[0])
                }
                Ok(_) => {}
                Err(e) => {
                    eprintln!("apu: {e}; bridge halted");
                    return;
                }
            }
        }
        // Bounded wait doubling as the stop check. No protocol timeout:
        // EXECUTING (or a stalled handshake) cycles here until the
        // channel disconnects at power-down.
        match stop_rx.recv_timeout(POLL_INTERVAL) {
            Err(RecvTimeoutError::Timeout) => {}
            _ => {
                engine.stop();
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(p0: u8, p1: u8, addr: u16) -> [u8; 4] {
        [p0, p1, addr as u8, (addr >> 8) as u8]
    }

    #[test]
    fn canonical_upload_sequence() {
        let mut e = HandshakeEngine::new();
        assert_eq!(e.state(), ApuState::NotInitialized);

        assert_eq!(e.observe(snap(0xCC, 0, 0x0200)).unwrap(), HandshakeEvent::Init);
        assert_eq!(e.state(), ApuState::Initialized);
        assert_eq!(e.cursor(), 0x0200);

        assert_eq!(e.observe(snap(0x01, b'A', 0)).unwrap(), HandshakeEvent::Data);
        assert_eq!(e.observe(snap(0x02, b'B', 0)).unwrap(), HandshakeEvent::Data);
        assert_eq!(e.observe(snap(0x05, 0x01, 0x0300)).unwrap(), HandshakeEvent::NewBlock);
        assert_eq!(e.cursor(), 0x0300);
        assert_eq!(e.observe(snap(0x06, b'C', 0)).unwrap(), HandshakeEvent::Data);
        assert_eq!(e.observe(snap(0x09, 0x00, 0)).unwrap(), HandshakeEvent::End);

        assert_eq!(e.state(), ApuState::Executing);
        assert_eq!(e.ram(0x0200), b'A');
        assert_eq!(e.ram(0x0201), b'B');
        assert_eq!(e.ram(0x0300), b'C');
    }

    #[test]
    fn events_echo_only_after_initialization() {
        let mut e = HandshakeEngine::new();
        // Data-shaped traffic before INIT still classifies as data, but
        // the bridge's echo gate (state >= INITIALIZED) stays closed.
        let ev = e.observe(snap(0x01, 0x7F, 0)).unwrap();
        assert_eq!(ev, HandshakeEvent::Data);
        assert!(e.state() < ApuState::Initialized);
        // END and no-change never echo; INIT does (and reaches the gate).
        assert!(!HandshakeEvent::End.echoes());
        assert!(!HandshakeEvent::NoChange.echoes());
        assert!(HandshakeEvent::Init.echoes());
    }

    #[test]
    fn same_port0_is_conflated_to_no_change() {
        let mut e = HandshakeEngine::new();
        e.observe(snap(0xCC, 0, 0x0200)).unwrap();
        e.observe(snap(0x01, b'A', 0)).unwrap();
        // Same cookie with different payload: swallowed.
        assert_eq!(
            e.observe(snap(0x01, b'Z', 0x1234)).unwrap(),
            HandshakeEvent::NoChange
        );
        assert_eq!(e.ram(0x0200), b'A');
        assert_eq!(e.ram(0x0201), 0);
    }

    #[test]
    fn initial_zero_port_is_no_change() {
        let mut e = HandshakeEngine::new();
        assert_eq!(e.observe([0, 0x55, 0, 0]).unwrap(), HandshakeEvent::NoChange);
    }

    #[test]
    fn data_counter_can_restart_at_zero() {
        let mut e = HandshakeEngine::new();
        e.observe(snap(0xCC, 0, 0x0100)).unwrap();
        e.observe(snap(0x01, 0x11, 0)).unwrap();
        assert_eq!(e.observe(snap(0x00, 0x22, 0)).unwrap(), HandshakeEvent::Data);
        assert_eq!(e.ram(0x0101), 0x22);
        // Counter restarted: next cookie is 1.
        assert_eq!(e.observe(snap(0x01, 0x33, 0)).unwrap(), HandshakeEvent::Data);
    }

    #[test]
    fn bad_cookie_is_fatal_and_halts_engine() {
        let mut e = HandshakeEngine::new();
        e.observe(snap(0xCC, 0, 0x0200)).unwrap();
        let err = e.observe(snap(0x42, 0, 0)).unwrap_err();
        assert!(matches!(err, ApuProtocolError::BadCookie { cookie: 0x42, .. }));
        assert_eq!(e.state(), ApuState::Stopped);
        // Frozen: further traffic is ignored.
        assert_eq!(e.observe(snap(0x01, 0, 0)).unwrap(), HandshakeEvent::NoChange);
    }

    #[test]
    fn block_boundary_wraps_zero_to_four() {
        let mut e = HandshakeEngine::new();
        e.observe(snap(0xCC, 0, 0x0200)).unwrap();
        e.anchor = 0xFC;
        e.last_cookie = 0xF0;
        assert_eq!(e.observe(snap(0x04, 0x00, 0)).unwrap(), HandshakeEvent::End);
    }

    #[test]
    fn executing_ignores_further_traffic() {
        let mut e = HandshakeEngine::new();
        e.observe(snap(0xCC, 0, 0x0200)).unwrap();
        e.observe(snap(0x01, 0xAA, 0)).unwrap();
        e.observe(snap(0x05, 0x00, 0)).unwrap();
        assert_eq!(e.state(), ApuState::Executing);
        assert_eq!(e.observe(snap(0x06, 0x55, 0)).unwrap(), HandshakeEvent::NoChange);
    }

    #[test]
    fn thread_presents_ready_signature_and_echoes() {
        let ports = Arc::new(ApuPorts::new());
        let mut apu = Apu::power_up(ports.clone());

        let mut ready = false;
        for _ in 0..500 {
            if ports.cpu_read(0) == READY_PORT0 && ports.cpu_read(1) == READY_PORT1 {
                ready = true;
                break;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        assert!(ready, "bridge never presented the ready signature");

        // Kick off a transfer and wait for the INIT echo.
        ports.cpu_write(2, 0x00);
        ports.cpu_write(3, 0x02);
        ports.cpu_write(1, 0x01);
        ports.cpu_write(0, 0xCC);
        let mut echoed = false;
        for _ in 0..500 {
            if ports.cpu_read(0) == 0xCC {
                echoed = true;
                break;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        assert!(echoed, "bridge never echoed the INIT cookie");

        apu.power_down();
    }

    #[test]
    fn power_down_joins_mid_protocol() {
        let ports = Arc::new(ApuPorts::new());
        let mut apu = Apu::power_up(ports.clone());
        ports.cpu_write(0, 0xCC);
        // Power down without completing the handshake; must not hang.
        apu.power_down();
        // Idempotent.
        apu.power_down();
    }
}
