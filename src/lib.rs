//! # rankboard
//!
//! A leaderboard service for speedrun-style communities: score and time
//! submissions go in, ranked boards come out.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (profiles, levels, categories,
//!   submissions, board rows)
//! - **engine**: Pure ranking computations (world records, medal tables,
//!   totalizers, position numbering)
//! - **storage**: Per-game JSONL tables
//! - **source**: Submission source seam (local store or remote mirror)
//! - **cache**: Per-game normalized-submission cache
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod cache;
pub mod config;
pub mod engine;
pub mod models;
pub mod source;
pub mod storage;

pub use models::*;
