//! Error types
//!
//! Generation itself never fails; these cover config input and the
//! post-generation invariant check.

use thiserror::Error;

/// Invalid or unreadable generator configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown track length preset `{0}` (expected sprint, standard or endurance)")]
    UnknownPreset(String),

    #[error("{field}: minimum {min} exceeds maximum {max}")]
    InvertedBand {
        field: &'static str,
        min: f32,
        max: f32,
    },

    #[error("{field} = {value} is below the minimum of {min}")]
    CapTooSmall {
        field: &'static str,
        value: usize,
        min: usize,
    },

    #[error("{field} = {value} must be a finite, non-negative weight")]
    InvalidWeight { field: &'static str, value: f32 },
}

/// A generated track that breaks one of its layout invariants
#[derive(Debug, Error, PartialEq)]
pub enum TrackError {
    #[error("track has no segments")]
    Empty,

    #[error("first segment is {0}, expected start")]
    MissingStart(&'static str),

    #[error("last segment is {0}, expected finish")]
    MissingFinish(&'static str),

    #[error("segment {index} is an extra {kind} gate")]
    ExtraGate { index: usize, kind: &'static str },

    #[error("checkpoint at segment {index} has order {found}, expected {expected}")]
    CheckpointOrder {
        index: usize,
        found: u32,
        expected: u32,
    },

    #[error("segments {a} and {b} overlap")]
    Overlap { a: usize, b: usize },

    #[error("finish committed while the road is banked ({bank} rad)")]
    BankedFinish { bank: f32 },

    #[error("{count} segments exceed the cap of {cap}")]
    TooLong { count: usize, cap: usize },

    #[error("segment {index} does not start where segment {prev} ends")]
    Disconnected { index: usize, prev: usize },
}
