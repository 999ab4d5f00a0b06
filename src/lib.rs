//! Mineopoly - deterministic two-player mining match engine
//!
//! Two strategies steer miners across a square board, dig resources,
//! haul them to their own market and sell into a shared dynamic-price
//! economy. Given a seed and fixed strategy decisions a match replays
//! byte-for-byte.

pub mod core;
pub mod error;
pub mod game;
pub mod loader;
pub mod tournament;

pub use error::{MineError, Result};
