//! The weather snapshot payload and its codec.
//!
//! A snapshot is the complete weather summary the companion renders: today's
//! high and low as preformatted display strings, plus one condition code per
//! day from the provider's open-ended numeric taxonomy. It travels as a CBOR
//! map keyed by stable strings, so encoders are free to emit fields in any
//! order.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Complete weather summary carried on [`WEATHER_SNAPSHOT`](crate::WEATHER_SNAPSHOT).
///
/// Immutable once decoded. The companion replaces its displayed snapshot
/// wholesale on every received message; fields are never merged across
/// messages, and with no sequence numbers on the wire the latest arrival
/// wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Today's high temperature, preformatted for display.
    #[serde(rename = "HIGH_TEMP")]
    pub today_high: String,

    /// Today's low temperature, preformatted for display.
    #[serde(rename = "LOW_TEMP")]
    pub today_low: String,

    /// Condition code for today.
    #[serde(rename = "WEATHER_ID")]
    pub today_condition: i32,

    /// Condition code for tomorrow.
    #[serde(rename = "TOMORROW_WEATHER_ID")]
    pub tomorrow_condition: i32,
}

impl WeatherSnapshot {
    /// Encode into a compact CBOR payload.
    pub fn encode(&self) -> Result<Bytes, ProtocolError> {
        let mut buf = Vec::new();
        ciborium::ser::into_writer(self, &mut buf)
            .map_err(|e| ProtocolError::Encode(e.to_string()))?;
        Ok(Bytes::from(buf))
    }

    /// Decode from payload bytes.
    ///
    /// Fails if a required key is absent or a value carries the wrong type
    /// tag. Unknown keys are ignored; the record may grow fields we do not
    /// know about yet.
    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        ciborium::de::from_reader(bytes).map_err(|e| ProtocolError::Decode(e.to_string()))
    }
}

impl Default for WeatherSnapshot {
    /// Placeholder shown before the first snapshot arrives: dashes for the
    /// temperatures and a clear sky for both days.
    fn default() -> Self {
        Self {
            today_high: "-".to_owned(),
            today_low: "-".to_owned(),
            today_condition: 800,
            tomorrow_condition: 800,
        }
    }
}

#[cfg(test)]
mod tests {
    use ciborium::value::Value;
    use proptest::prelude::*;

    use super::*;

    fn encode_value(value: &Value) -> Vec<u8> {
        let mut buf = Vec::new();
        ciborium::ser::into_writer(value, &mut buf).expect("value should encode");
        buf
    }

    fn sample() -> WeatherSnapshot {
        WeatherSnapshot {
            today_high: "25\u{00b0}".to_owned(),
            today_low: "16\u{00b0}".to_owned(),
            today_condition: 802,
            tomorrow_condition: 500,
        }
    }

    #[test]
    fn round_trip_preserves_fields() {
        let snapshot = sample();
        let bytes = snapshot.encode().unwrap();
        assert_eq!(WeatherSnapshot::decode(&bytes).unwrap(), snapshot);
    }

    #[test]
    fn decode_rejects_missing_key() {
        // Map with HIGH_TEMP absent.
        let value = Value::Map(vec![
            (Value::Text("LOW_TEMP".into()), Value::Text("16".into())),
            (Value::Text("WEATHER_ID".into()), Value::Integer(800.into())),
            (Value::Text("TOMORROW_WEATHER_ID".into()), Value::Integer(800.into())),
        ]);
        let result = WeatherSnapshot::decode(&encode_value(&value));
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn decode_rejects_type_mismatch() {
        // HIGH_TEMP carries an integer where a string is required.
        let value = Value::Map(vec![
            (Value::Text("HIGH_TEMP".into()), Value::Integer(25.into())),
            (Value::Text("LOW_TEMP".into()), Value::Text("16".into())),
            (Value::Text("WEATHER_ID".into()), Value::Integer(800.into())),
            (Value::Text("TOMORROW_WEATHER_ID".into()), Value::Integer(800.into())),
        ]);
        let result = WeatherSnapshot::decode(&encode_value(&value));
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn decode_ignores_unknown_keys() {
        let value = Value::Map(vec![
            (Value::Text("HIGH_TEMP".into()), Value::Text("25".into())),
            (Value::Text("LOW_TEMP".into()), Value::Text("16".into())),
            (Value::Text("WEATHER_ID".into()), Value::Integer(801.into())),
            (Value::Text("TOMORROW_WEATHER_ID".into()), Value::Integer(600.into())),
            (Value::Text("TIMESTAMP".into()), Value::Integer(1_700_000_000.into())),
        ]);
        let snapshot = WeatherSnapshot::decode(&encode_value(&value)).unwrap();
        assert_eq!(snapshot.today_condition, 801);
        assert_eq!(snapshot.tomorrow_condition, 600);
    }

    #[test]
    fn decode_rejects_empty_payload() {
        assert!(matches!(WeatherSnapshot::decode(&[]), Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn default_is_placeholder_display() {
        let snapshot = WeatherSnapshot::default();
        assert_eq!(snapshot.today_high, "-");
        assert_eq!(snapshot.today_low, "-");
        assert_eq!(snapshot.today_condition, 800);
        assert_eq!(snapshot.tomorrow_condition, 800);
    }

    proptest! {
        #[test]
        fn round_trip_law(
            today_high in ".{0,16}",
            today_low in ".{0,16}",
            today_condition in proptest::num::i32::ANY,
            tomorrow_condition in proptest::num::i32::ANY,
        ) {
            let snapshot = WeatherSnapshot {
                today_high,
                today_low,
                today_condition,
                tomorrow_condition,
            };
            let bytes = snapshot.encode().unwrap();
            prop_assert_eq!(WeatherSnapshot::decode(&bytes).unwrap(), snapshot);
        }
    }
}
