//! Transport.
//!
//! Owns the TCP connection and exposes a strictly non-blocking surface to
//! the frame loop: [`Transport::poll_messages`] drains everything decoded
//! since the last call and [`Transport::send_message`] enqueues without
//! waiting. All socket IO happens on two spawned tasks bridged to the
//! frame thread with unbounded channels.
//!
//! Undecodable frames are dropped here with a diagnostic and a counter;
//! they never terminate the connection. Connection loss is a separate
//! terminal condition reported by [`Transport::is_closed`].

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Context;
use realm_shared::wire::{decode_frame, encode_frame, Message, MAX_FRAME_LEN};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Outbound seam so scenes can be tested against a recording sink.
pub trait MessageSink {
    fn send_message(&mut self, msg: Message);
}

/// Non-blocking handle to the server connection.
pub struct Transport {
    outbound: mpsc::UnboundedSender<Message>,
    inbound: mpsc::UnboundedReceiver<Message>,
    closed: Arc<AtomicBool>,
    decode_drops: Arc<AtomicU64>,
}

impl Transport {
    /// Connects to the server. Must be called within a Tokio runtime.
    pub async fn connect(addr: &str) -> anyhow::Result<Self> {
        let addr: SocketAddr = addr.parse().context("parse server address")?;
        let stream = TcpStream::connect(addr).await.context("tcp connect")?;
        Ok(Self::from_stream(stream))
    }

    /// Wraps an established stream, spawning the reader/writer tasks.
    pub fn from_stream(stream: TcpStream) -> Self {
        let (read_half, write_half) = stream.into_split();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let closed = Arc::new(AtomicBool::new(false));
        let decode_drops = Arc::new(AtomicU64::new(0));

        tokio::spawn(reader_task(
            read_half,
            inbound_tx,
            Arc::clone(&closed),
            Arc::clone(&decode_drops),
        ));
        tokio::spawn(writer_task(write_half, outbound_rx, Arc::clone(&closed)));

        Self {
            outbound: outbound_tx,
            inbound: inbound_rx,
            closed,
            decode_drops,
        }
    }

    /// Drains all messages decoded since the last call, in receipt order.
    /// Never blocks; returns an empty vec when nothing is ready.
    pub fn poll_messages(&mut self) -> Vec<Message> {
        let mut out = Vec::new();
        while let Ok(msg) = self.inbound.try_recv() {
            out.push(msg);
        }
        out
    }

    /// True once either IO task has observed the connection going away.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }

    /// Number of inbound frames dropped because they would not decode.
    pub fn decode_drop_count(&self) -> u64 {
        self.decode_drops.load(Ordering::Relaxed)
    }
}

impl MessageSink for Transport {
    fn send_message(&mut self, msg: Message) {
        if self.outbound.send(msg).is_err() {
            debug!("send after connection close, message discarded");
        }
    }
}

async fn reader_task(
    mut read: OwnedReadHalf,
    inbound: mpsc::UnboundedSender<Message>,
    closed: Arc<AtomicBool>,
    decode_drops: Arc<AtomicU64>,
) {
    loop {
        let mut len_buf = [0u8; 4];
        if let Err(e) = read.read_exact(&mut len_buf).await {
            debug!(error = %e, "read stream ended");
            break;
        }
        let len = u32::from_be_bytes(len_buf) as usize;
        if len > MAX_FRAME_LEN {
            // Cannot resynchronize a length-prefixed stream after a bogus
            // length; treat as connection loss.
            warn!(len, "oversized frame length, closing connection");
            break;
        }
        let mut body = vec![0u8; len];
        if let Err(e) = read.read_exact(&mut body).await {
            debug!(error = %e, "read stream ended mid-frame");
            break;
        }
        // The whole frame was consumed, so a bad body never desyncs the
        // stream; drop it and keep reading.
        match decode_frame(&body) {
            Ok(msg) => {
                if inbound.send(msg).is_err() {
                    break;
                }
            }
            Err(e) => {
                decode_drops.fetch_add(1, Ordering::Relaxed);
                warn!(error = %e, "dropping undecodable frame");
            }
        }
    }
    closed.store(true, Ordering::Relaxed);
}

async fn writer_task(
    mut write: OwnedWriteHalf,
    mut outbound: mpsc::UnboundedReceiver<Message>,
    closed: Arc<AtomicBool>,
) {
    while let Some(msg) = outbound.recv().await {
        match encode_frame(&msg) {
            Ok(frame) => {
                if let Err(e) = write.write_all(&frame).await {
                    debug!(error = %e, "write stream ended");
                    closed.store(true, Ordering::Relaxed);
                    return;
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to encode outbound message");
            }
        }
    }
    // Outbound sender dropped: the Transport itself is gone.
}

/// Collects sent messages; useful for scene unit tests.
#[derive(Default)]
pub struct RecordingSink {
    pub sent: Vec<Message>,
}

impl MessageSink for RecordingSink {
    fn send_message(&mut self, msg: Message) {
        self.sent.push(msg);
    }
}
