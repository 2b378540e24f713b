// src/lib.rs

//! Odds feed library: harvests lobby and event odds, publishes one atomic
//! JSON snapshot per cycle.

pub mod browser;
pub mod error;
pub mod models;
pub mod pipeline;
#[cfg(feature = "serve")]
pub mod serve;
pub mod services;
pub mod storage;
pub mod utils;
