//! Deterministic test harness for the Sundial engines.
//!
//! Fake implementations of the platform surface for reproducible tests: a
//! manually advanced wall clock, a recording [`Driver`](sundial_engine::Driver)
//! double, and a [`World`] that pairs one companion face with one primary
//! responder over an in-memory link with seeded fault injection.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod clock;
pub mod driver;
pub mod world;

pub use clock::VirtualClock;
pub use driver::{FakeDriver, SendRefused, SentMessage};
pub use world::World;
