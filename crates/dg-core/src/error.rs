//! Errors and reported conditions
//!
//! Fatal problems are limited to bad configuration and cancellation. Layout
//! problems found during generation are non-fatal: they are collected as
//! [`GenerationIssue`]s on the report and the graph is still published.

use serde::Serialize;
use thiserror::Error;

use crate::pipeline::PipelineState;

/// Configuration rejected before generation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("start size must be positive, got {width}x{height}")]
    InvalidStartSize { width: i32, height: i32 },

    #[error("minimum room size must be positive, got {x}x{y}")]
    InvalidMinRoomSize { x: i32, y: i32 },

    #[error("prune fraction must lie in 0..=1, got {0}")]
    InvalidPruneFraction(f64),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Generation did not run to completion
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationError {
    #[error("generation cancelled while {stage}")]
    Cancelled { stage: PipelineState },
}

/// Non-fatal condition reported alongside a published graph
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationIssue {
    /// Start room too small to split; the dungeon is a single room
    #[error("start room is below the split threshold, layout is a single room")]
    DegenerateConfig,

    /// Pruning stopped because removing `room` split the graph
    #[error("pruning room #{room} disconnected the layout, pruning stopped")]
    PruningDisconnected { room: u32 },

    /// Final reachability check failed
    #[error("final layout is not connected ({components} components)")]
    ConnectivityFailed { components: usize },
}

impl GenerationIssue {
    /// Whether the issue means the published graph is not fully connected
    pub fn breaks_connectivity(&self) -> bool {
        !matches!(self, GenerationIssue::DegenerateConfig)
    }
}
