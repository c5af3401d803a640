//! Application layer for Sundial
//!
//! Pure engines for both ends of the weather link, plus a generic runtime,
//! enabling deterministic simulation testing with the same code that runs
//! against a real platform.
//!
//! # Components
//!
//! - [`FaceEngine`]: companion watch face (visibility, refresh, render loop)
//! - [`ForecastResponder`]: primary-side request/notify responder
//! - [`Driver`]: trait for platform-specific I/O abstraction
//! - [`Runtime`]: generic orchestration loop using Driver

mod action;
mod display;
mod driver;
mod event;
mod face;
mod forecast;
mod runtime;

pub use action::{FaceAction, ForecastAction};
pub use display::DisplayState;
pub use driver::Driver;
pub use event::{FaceEvent, ForecastEvent};
pub use face::FaceEngine;
pub use forecast::ForecastResponder;
pub use runtime::Runtime;
