//! Dungeon layout generator
//!
//! Builds a rectilinear dungeon by recursively splitting a start rectangle
//! into rooms, joining rooms that share a wall with one-cell doors, pruning
//! the smallest rooms, and checking that every node is still reachable.
//!
//! The [`GenerationPipeline`] drives those stages over a [`dungeon::NodeGraph`]
//! and publishes a [`GenerationReport`] at the end.

pub mod config;
pub mod dungeon;
pub mod error;
pub mod pipeline;
mod rng;

pub use config::{GeneratorConfig, MinRoomSize, Size};
pub use error::{ConfigError, GenerationError, GenerationIssue};
pub use pipeline::{CancelToken, GenerationPipeline, GenerationReport, PipelineState, StepEvent};
pub use rng::DungeonRng;
