//! Wire format for the Sundial weather link.
//!
//! The link carries exactly two message kinds, one per logical channel: a
//! zero-payload refresh request from the companion, and a weather snapshot
//! from the primary. The snapshot payload is a CBOR map with stable string
//! keys, so field order in the byte stream carries no meaning; only the keys
//! and their type tags must match between encode and decode.
//!
//! Delivery is best effort. No sequence numbers are exchanged; receivers
//! treat the latest-arriving snapshot as authoritative.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod channel;
pub mod error;
pub mod snapshot;

pub use channel::{PeerId, REFRESH_REQUEST, WEATHER_SNAPSHOT};
pub use error::ProtocolError;
pub use snapshot::WeatherSnapshot;
