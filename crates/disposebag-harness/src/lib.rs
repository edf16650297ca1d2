#![forbid(unsafe_code)]

//! Test harness for disposebag.
//!
//! - [`TestScheduler`]: virtual time. Work only runs when the test advances
//!   the clock, so "fires every 5 units" is deterministic.
//! - [`ScheduledTask`]: the disposable handle for scheduled work.
//! - [`TestLifecycleOwner`]: a lifecycle owner with one-call helpers for the
//!   transitions tests care about.

pub mod owner;
pub mod scheduler;

pub use owner::TestLifecycleOwner;
pub use scheduler::{ScheduledTask, TestScheduler};
