//! Sundial core logic
//!
//! Pure state machine logic for the weather link, completely decoupled from
//! I/O. This enables deterministic testing of the connection lifecycle and
//! the render loop without a transport or a display.
//!
//! # Architecture
//!
//! Every component here is a deterministic state machine isolated from I/O,
//! time, and scheduling. Time is supplied by the caller as wall-clock
//! milliseconds; state transitions produce declarative actions describing
//! intended effects rather than executing them. A runtime or test harness
//! interprets the actions.
//!
//! All callbacks for one owner are serialized onto a single cooperative
//! event queue, so no handler ever observes another handler mid-flight and
//! no locking is needed around the state these machines carry.
//!
//! # Components
//!
//! - [`session`]: transport session lifecycle (connect, suspend, teardown)
//! - [`classify`]: condition code to visual category mapping
//! - [`scheduler`]: second-aligned render scheduler
//! - [`error`]: session error types

pub mod classify;
pub mod error;
pub mod scheduler;
pub mod session;
