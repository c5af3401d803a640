//! Weather condition classification.
//!
//! Maps a provider condition code onto the discrete set of visual categories
//! the renderer can draw, plus the background theme used for today's half of
//! the display. The taxonomy behind the codes is open-ended; anything
//! unrecognized falls back to a clear sky rather than failing.

/// Visual category for a condition code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    /// Thunderstorm, drawn with the lightning glyph.
    Thunderstorm,
    /// Drizzle or light rain.
    Rain,
    /// Heavy rain and showers.
    HeavyRain,
    /// Snow, including freezing rain.
    Snow,
    /// Fog, mist, haze and other atmospheric obscurants.
    Fog,
    /// Clear sky. Also the fallback for unrecognized codes.
    Clear,
    /// A few clouds.
    PartlyCloudy,
    /// Broken or overcast clouds.
    Cloudy,
    /// Strong wind.
    Windy,
    /// Hail.
    Hail,
}

/// Background theme selected by today's condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    /// Bright background for a clear sky.
    Sunny,
    /// Dark background for precipitation of any kind.
    Rainy,
    /// Muted background for clouds and fog.
    Cloudy,
}

/// Result of classifying one condition code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Category the renderer draws.
    pub condition: Condition,
    /// Background theme; populated only for today's code, since tomorrow's
    /// half of the display never drives the background.
    pub theme: Option<Theme>,
}

/// Classify `code` into a visual category, plus a background theme when it
/// is today's code.
///
/// Total over the full `i32` range. The range checks run in a fixed order
/// and the first match wins: code 761 sits in both the fog range and the
/// explicit thunderstorm pair below it, and resolves to fog because the fog
/// range is checked first. That ordering is part of the contract.
pub fn classify(code: i32, today: bool) -> Classification {
    let (condition, theme) = if (200..=232).contains(&code) {
        (Condition::Thunderstorm, Theme::Rainy)
    } else if (300..=321).contains(&code) || code == 500 {
        (Condition::Rain, Theme::Rainy)
    } else if (501..=504).contains(&code) {
        (Condition::HeavyRain, Theme::Rainy)
    } else if code == 511 {
        (Condition::Snow, Theme::Rainy)
    } else if (520..=531).contains(&code) {
        (Condition::HeavyRain, Theme::Rainy)
    } else if (600..=622).contains(&code) {
        // Snow keeps the precipitation background, not a white one.
        (Condition::Snow, Theme::Rainy)
    } else if (701..=761).contains(&code) {
        (Condition::Fog, Theme::Cloudy)
    } else if code == 761 || code == 781 {
        // 761 is shadowed by the fog range above; only 781 reaches this arm.
        (Condition::Thunderstorm, Theme::Rainy)
    } else if code == 800 {
        (Condition::Clear, Theme::Sunny)
    } else if code == 801 {
        (Condition::PartlyCloudy, Theme::Cloudy)
    } else if (802..=804).contains(&code) {
        (Condition::Cloudy, Theme::Cloudy)
    } else if code == 905 {
        (Condition::Windy, Theme::Rainy)
    } else if code == 906 {
        (Condition::Hail, Theme::Rainy)
    } else {
        (Condition::Clear, Theme::Sunny)
    };

    Classification { condition, theme: today.then_some(theme) }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn canonical_points() {
        assert_eq!(
            classify(800, true),
            Classification { condition: Condition::Clear, theme: Some(Theme::Sunny) }
        );
        assert_eq!(classify(511, false).condition, Condition::Snow);
        assert_eq!(classify(9999, false).condition, Condition::Clear);
        assert_eq!(classify(905, false).condition, Condition::Windy);
        assert_eq!(classify(906, false).condition, Condition::Hail);
        assert_eq!(classify(801, false).condition, Condition::PartlyCloudy);
    }

    #[test]
    fn code_761_is_fog_by_range_order() {
        // 761 matches both the fog range and the explicit thunderstorm pair;
        // the fog check runs first and wins.
        assert_eq!(
            classify(761, true),
            Classification { condition: Condition::Fog, theme: Some(Theme::Cloudy) }
        );
        assert_eq!(classify(781, true).condition, Condition::Thunderstorm);
    }

    #[test]
    fn range_boundaries() {
        assert_eq!(classify(200, false).condition, Condition::Thunderstorm);
        assert_eq!(classify(232, false).condition, Condition::Thunderstorm);
        assert_eq!(classify(233, false).condition, Condition::Clear);
        assert_eq!(classify(500, false).condition, Condition::Rain);
        assert_eq!(classify(501, false).condition, Condition::HeavyRain);
        assert_eq!(classify(504, false).condition, Condition::HeavyRain);
        assert_eq!(classify(505, false).condition, Condition::Clear);
        assert_eq!(classify(520, false).condition, Condition::HeavyRain);
        assert_eq!(classify(531, false).condition, Condition::HeavyRain);
        assert_eq!(classify(600, false).condition, Condition::Snow);
        assert_eq!(classify(622, false).condition, Condition::Snow);
        assert_eq!(classify(623, false).condition, Condition::Clear);
        assert_eq!(classify(700, false).condition, Condition::Clear);
        assert_eq!(classify(701, false).condition, Condition::Fog);
        assert_eq!(classify(802, false).condition, Condition::Cloudy);
        assert_eq!(classify(804, false).condition, Condition::Cloudy);
        assert_eq!(classify(805, false).condition, Condition::Clear);
    }

    #[test]
    fn themes_follow_the_background_table() {
        assert_eq!(classify(210, true).theme, Some(Theme::Rainy));
        assert_eq!(classify(600, true).theme, Some(Theme::Rainy));
        assert_eq!(classify(721, true).theme, Some(Theme::Cloudy));
        assert_eq!(classify(801, true).theme, Some(Theme::Cloudy));
        assert_eq!(classify(800, true).theme, Some(Theme::Sunny));
        assert_eq!(classify(-40, true).theme, Some(Theme::Sunny));
    }

    #[test]
    fn total_over_a_wide_code_range() {
        for code in -1000..=1000 {
            let today = classify(code, true);
            assert!(today.theme.is_some(), "no theme for code {code}");
            let tomorrow = classify(code, false);
            assert_eq!(today.condition, tomorrow.condition);
        }
    }

    proptest! {
        #[test]
        fn theme_present_only_for_today(code in proptest::num::i32::ANY) {
            prop_assert!(classify(code, true).theme.is_some());
            prop_assert!(classify(code, false).theme.is_none());
        }
    }
}
