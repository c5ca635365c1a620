//! Live document model for fixers.
//!
//! This module handles:
//! - An arena-backed document tree with mutation records
//! - Per-target observation registrations with batched delivery
//! - Descendant-chain selectors and the landmark locator

pub mod locator;
pub mod selector;
pub mod tree;

pub use locator::{LandmarkLocator, SidebarLocator};
pub use selector::{ClassMatch, Compound, Selector, query_selector, query_selector_all};
pub use tree::{Document, MutationKind, MutationRecord, NodeId, ObserveOptions, ObserverId};
