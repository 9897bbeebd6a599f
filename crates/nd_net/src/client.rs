//! Delivers one physical controller's share of a Site's pixel buffer over
//! TCP, in order, best-effort, with bounded memory.
//!
//! [`StripClient`] is the thin, shared-state handle the Site render thread
//! calls into (`ready_for_data`, `enqueue`); [`run_send_worker`] is the
//! dedicated thread loop that owns the socket and the reconnect state
//! machine. The split mirrors the engine's pure-core/threaded-driver
//! boundary: the render thread never touches the socket directly.

use std::io::{ErrorKind, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use nd_core::Pixel;
use parking_lot::Mutex;

use crate::error::{Result, StripError};
use crate::queue::{FrameQueue, QUEUE_CAPACITY};
use crate::state::{next_backoff, ConnectionState, INITIAL_BACKOFF};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const WRITE_TIMEOUT: Duration = Duration::from_secs(2);
const POP_TIMEOUT: Duration = Duration::from_millis(100);

/// Shared handle a Site render thread enqueues frames through.
#[derive(Clone)]
pub struct StripClient {
    addr: SocketAddr,
    channel_mask: u16,
    compress: bool,
    queue: Arc<FrameQueue>,
    state: Arc<Mutex<ConnectionState>>,
    drops: Arc<AtomicU64>,
}

impl StripClient {
    #[must_use]
    pub fn new(addr: SocketAddr, channel_mask: u16, compress: bool) -> Self {
        Self {
            addr,
            channel_mask,
            compress,
            queue: Arc::new(FrameQueue::new()),
            state: Arc::new(Mutex::new(ConnectionState::Disconnected)),
            drops: Arc::new(AtomicU64::new(0)),
        }
    }

    #[must_use]
    pub fn ready_for_data(&self) -> bool {
        *self.state.lock() == ConnectionState::Connected && self.queue.len() < QUEUE_CAPACITY
    }

    #[must_use]
    pub fn drop_count(&self) -> u64 {
        self.drops.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state.lock()
    }

    /// Encodes `pixels` and pushes the frame if [`Self::ready_for_data`];
    /// otherwise drops it silently and bumps the drop counter. Safe to call
    /// on every tick regardless of connection state — readiness is checked
    /// internally, so callers don't need to gate this themselves.
    pub fn enqueue(&self, pixels: &[Pixel], seconds: u64, micros: u32) {
        if !self.ready_for_data() {
            self.drops.fetch_add(1, Ordering::Relaxed);
            return;
        }
        match encode_frame(pixels, self.channel_mask, seconds, micros, self.compress) {
            Ok(frame) => {
                if !self.queue.push_if_room(frame) {
                    self.drops.fetch_add(1, Ordering::Relaxed);
                }
            }
            Err(e) => {
                log::warn!("strip {}: {e}", self.addr);
                self.drops.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Spawns the dedicated send worker thread for this strip.
    pub fn spawn_worker(&self) -> std::thread::JoinHandle<()> {
        let addr = self.addr;
        let queue = Arc::clone(&self.queue);
        let state = Arc::clone(&self.state);
        std::thread::Builder::new()
            .name(format!("nd-strip-{addr}"))
            .spawn(move || run_send_worker(addr, &queue, &state))
            .expect("failed to spawn strip send worker thread")
    }
}

/// The send worker's main loop. Runs until the process exits; strips are
/// never torn down mid-run in this design.
pub fn run_send_worker(addr: SocketAddr, queue: &FrameQueue, state: &Mutex<ConnectionState>) {
    let mut backoff = INITIAL_BACKOFF;
    let mut socket: Option<TcpStream> = None;

    loop {
        if socket.is_none() {
            *state.lock() = ConnectionState::Connecting;
            match connect(addr) {
                Ok(s) => {
                    *state.lock() = ConnectionState::Connected;
                    backoff = INITIAL_BACKOFF;
                    socket = Some(s);
                }
                Err(e) => {
                    log::warn!("strip {addr}: {e}");
                    *state.lock() = ConnectionState::Backoff;
                    std::thread::sleep(backoff.min(Duration::from_secs(5)));
                    backoff = next_backoff(backoff);
                    continue;
                }
            }
        }

        let Some(frame) = queue.pop_blocking(POP_TIMEOUT) else {
            continue;
        };

        let s = socket.as_mut().expect("socket is Some in this branch");
        if let Err(e) = send_frame(s, &frame) {
            log::warn!("strip {addr}: {e}, reconnecting");
            socket = None;
            *state.lock() = ConnectionState::Backoff;
            queue.discard_front();
            std::thread::sleep(backoff.min(Duration::from_secs(5)));
            backoff = next_backoff(backoff);
        }
    }
}

/// Connects with the 5s connect timeout, disables Nagle, and sets the 2s
/// write timeout, per §5.
fn connect(addr: SocketAddr) -> Result<TcpStream> {
    let socket = TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT).map_err(|e| {
        if e.kind() == ErrorKind::TimedOut {
            StripError::ConnectTimeout(CONNECT_TIMEOUT)
        } else {
            StripError::Io(e)
        }
    })?;
    socket.set_nodelay(true)?;
    socket.set_write_timeout(Some(WRITE_TIMEOUT))?;
    Ok(socket)
}

fn send_frame(socket: &mut TcpStream, frame: &[u8]) -> Result<()> {
    socket.write_all(frame).map_err(StripError::from)
}

fn encode_frame(
    pixels: &[Pixel],
    channel_mask: u16,
    seconds: u64,
    micros: u32,
    compress: bool,
) -> Result<Vec<u8>> {
    Ok(nd_core::codec::encode(
        pixels, channel_mask, seconds, micros, compress,
    )?)
}
