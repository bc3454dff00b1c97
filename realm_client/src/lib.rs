//! `realm_client`
//!
//! Client-side systems:
//! - Transport over TCP with a non-blocking poll/send surface
//! - Per-frame message queue and batch dispatch
//! - Scene state machine with a cosmetic transition fade
//! - Remote player pool with interpolation
//! - Local player movement and replication
//! - Top-level frame-loop driver with crash reporting

pub mod client;
pub mod crash;
pub mod game;
pub mod input;
pub mod login;
pub mod player;
pub mod pool;
pub mod queue;
pub mod scene;
pub mod transport;

pub use client::{Client, FrameOutcome};
