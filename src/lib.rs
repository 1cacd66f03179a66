//! Perturb the topology of an undirected graph toward a target edge count
//! and compare its descriptive statistics before and after

pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod modify;
pub mod stats;
pub mod storage;

pub use anyhow::{anyhow, Result};
pub use config::ModifierConfig;
pub use error::{CentralityError, TopologyError};
pub use graph::TopologyGraph;
pub use modify::{modify, EdgeRecord, ModificationResult, Mutation, TopologyModifier};
pub use stats::StatsSnapshot;
