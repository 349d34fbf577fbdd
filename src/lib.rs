//! Snakes & Ladders game server
//!
//! Authoritative backend for a two-player Snake & Ladder board game with two
//! clients: a web UI and a microcontroller wired to a physical die. Both push
//! state changes through the same HTTP command gateway. The engine owns the
//! turn and lifecycle state machine, records every transition in an
//! append-only event log, and archives finished games into a history list.

pub mod app;
pub mod config;
pub mod game;
pub mod http;
pub mod store;
pub mod util;
