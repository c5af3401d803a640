//! Logical message channels and peer identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Channel carrying the zero-payload refresh request (companion to primary).
///
/// Receiving it obliges the primary to gather a current forecast and send a
/// snapshot back to the originating peer. Receiving it twice re-sends the
/// current snapshot twice.
pub const REFRESH_REQUEST: &str = "/refresh-request";

/// Channel carrying an encoded [`WeatherSnapshot`](crate::WeatherSnapshot)
/// (primary to companion).
pub const WEATHER_SNAPSHOT: &str = "/weather-snapshot";

/// Opaque identifier of a reachable peer on the transport.
///
/// Peer identifiers come from the transport's enumeration call and are never
/// interpreted; they are only handed back when sending.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerId(String);

impl PeerId {
    /// Wrap a transport-assigned identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier, for handing back to the transport.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PeerId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}
