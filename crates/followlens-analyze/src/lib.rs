//! Analysis algorithms for followlens.
//!
//! This crate turns extracted datasets into an analysis:
//!
//! - **Merging** - Deduplicate entries of the same kind across multi-part exports
//! - **Follow graph** - Mutuals, one-way relationships and follow KPIs
//! - **Assembly** - The single aggregate state downstream code consumes
//! - **Snapshot diffs** - What changed between two lite snapshots
//!
//! # Follow graph
//!
//! ```rust
//! use followlens_analyze::build_graph;
//! use followlens_core::RelationshipEntry;
//!
//! let followers = ["a", "b", "c"].map(RelationshipEntry::new);
//! let following = ["B", "@c", "d"].map(RelationshipEntry::new);
//!
//! let graph = build_graph(&followers, &following);
//! assert_eq!(graph.metrics().mutual_count, 2);
//! assert_eq!(graph.metrics().reciprocity_rate, 0.6667);
//! ```
//!
//! # Snapshot diffs
//!
//! ```rust
//! use followlens_analyze::diff;
//! use followlens_core::LiteSnapshot;
//!
//! let baseline = LiteSnapshot::new(vec!["a".into(), "b".into()], vec![]);
//! let target = LiteSnapshot::new(vec!["b".into(), "c".into()], vec![]);
//!
//! let delta = diff(&baseline, &target);
//! assert_eq!(delta.new_followers[0].username, "c");
//! assert_eq!(delta.lost_followers[0].username, "a");
//! ```

mod assemble;
mod diff;
mod graph;
mod merge;
pub mod requests;

pub use assemble::{Assembly, assemble, attach_comparison, project};
pub use diff::{diff, mutual_count};
pub use graph::{DerivedLists, FollowGraph, build_graph};
pub use merge::{MergedDatasets, index_entries, merge_datasets};
pub use requests::filter_older_than;

// Re-export core types
pub use followlens_core::{
    AssembledState, Delta, ExtractedDataset, FollowMetrics, LiteSnapshot, RelationshipEntry,
};
