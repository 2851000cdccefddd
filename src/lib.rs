#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

//! K-way merge of owned sorted linked lists, and concurrent writers sharing one map.
//!
//! # kway::merge_k_lists
//! Merges k ordered [`List`] sequences into one by re-linking their nodes through a min-heap.
//!
//! # kway::merge_k_lists_pairwise
//! The same merge done by merging sequences two at a time.
//!
//! # kway::run_writers
//! Parallel writers upserting overlapping keys into one [`SharedMap`].
//!
//! # kway::Sequencing
//! Plans the rolling order of [`PieceStep`] coils so that thickness changes stay small.

mod list;
pub use list::{IntoIter, Iter, List, ListNode};

mod merge;
pub use merge::{
    merge_k_lists, merge_k_lists_pairwise, merge_two_lists, ParseStrategyError, Strategy,
};

mod shared_map;
pub use shared_map::{
    key_for, run_writers, value_for, verify, SharedMap, WriteReport, WriterConfig, WriterError,
};

#[cfg(feature = "async")]
pub use shared_map::run_writers_async;

mod schedule;
pub use schedule::{
    order_with_endpoints, plan_transitions, select_endpoints, smooth_transitions, split_by_grade,
    thin_first, total_thickness_change, transition_cost, ParseSequencingError, PieceStep,
    Sequencing,
};

#[cfg(feature = "serde")]
mod serde;
