//! Companion display state.

use sundial_core::classify::{Condition, Theme, classify};
use sundial_proto::WeatherSnapshot;

/// Everything the external renderer needs to paint the weather half of the
/// face.
///
/// Owned exclusively by one [`FaceEngine`](crate::FaceEngine) and replaced
/// wholesale when a snapshot decodes; a malformed payload leaves it
/// untouched, so the face keeps showing the last-known weather.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayState {
    /// Latest decoded snapshot. Placeholder dashes before the first one.
    pub snapshot: WeatherSnapshot,

    /// Today's visual category.
    pub today: Condition,

    /// Tomorrow's visual category.
    pub tomorrow: Condition,

    /// Background theme, selected by today's code.
    pub theme: Theme,

    /// Whether text is drawn anti-aliased. Turned off in ambient mode on
    /// low-bit displays.
    pub anti_alias: bool,
}

impl DisplayState {
    /// Replace the displayed snapshot and reclassify both days.
    pub(crate) fn apply(&mut self, snapshot: WeatherSnapshot) {
        let today = classify(snapshot.today_condition, true);
        self.today = today.condition;
        self.theme = today.theme.unwrap_or(Theme::Sunny);
        self.tomorrow = classify(snapshot.tomorrow_condition, false).condition;
        self.snapshot = snapshot;
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        let mut state = Self {
            snapshot: WeatherSnapshot::default(),
            today: Condition::Clear,
            tomorrow: Condition::Clear,
            theme: Theme::Sunny,
            anti_alias: true,
        };
        state.apply(WeatherSnapshot::default());
        state
    }
}
