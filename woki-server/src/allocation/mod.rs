//! Seat Allocation Engine (座位分配引擎)
//!
//! The pipeline behind every booking attempt:
//!
//! 1. [`gaps`] — free intervals per table, intersected for combinations
//! 2. [`candidates`] — every feasible seating on the 15-minute grid, scored
//! 3. [`selection`] — deterministic total order, one winner
//! 4. [`lock`] + [`coordinator`] — confirm the winner exactly once

pub mod candidates;
pub mod coordinator;
pub mod gaps;
pub mod lock;
pub mod selection;

pub use candidates::{Candidate, CandidateGenerator, DEFAULT_MAX_COMBO_TABLES, Seating};
pub use coordinator::{AllocationCoordinator, AllocationRequest};
pub use gaps::{Gap, find_gaps, intersect_all};
pub use lock::{LockRegistry, slot_lock_key};
pub use selection::{rank, select_best};
