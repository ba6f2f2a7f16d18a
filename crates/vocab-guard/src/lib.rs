//! Mutation guard for patching a shared external resource.
//!
//! Workers that may race to change the same downstream resource wrap the
//! change in [`MutationGuard::with_guard`], keyed by a [`LogicalKey`] built
//! from the operation and its arguments. One worker runs the body; the others
//! get [`GuardOutcome::Skipped`] immediately.
//!
//! The backing store only has to provide the two atomic primitives of
//! [`CoordinationStore`]. [`MemoryCoordinationStore`] serves a single process
//! and tests; its [`Clock`] seam lets tests move time forward.

pub mod config;
pub mod error;
pub mod guard;
pub mod key;
pub mod store;

pub use config::GuardConfig;
pub use error::GuardError;
pub use guard::{GuardOutcome, GuardToken, MutationGuard};
pub use key::LogicalKey;
pub use store::{Clock, CoordinationStore, ManualClock, MemoryCoordinationStore, SystemClock};
