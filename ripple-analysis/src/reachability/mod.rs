//! Reachability engine.
//!
//! Forward and inverse breadth-first traversal over the assembled graph:
//! "what data can this function eventually touch" and "what entry points
//! can eventually touch this data". Traversal is iterative with an explicit
//! frontier and visited-set; cycle termination is an invariant, not an
//! accident of stack depth.

pub mod engine;
pub mod sensitivity;
pub mod types;

pub use engine::ReachabilityEngine;
pub use sensitivity::{SensitivityClass, SensitivityClassifier};
pub use types::{
    CallPathNode, CodeLocation, InverseAccessPath, InverseOptions, InverseResult,
    ReachabilityOptions, ReachabilityResult, ReachableAccess, SensitiveHit, UnknownReach,
};
