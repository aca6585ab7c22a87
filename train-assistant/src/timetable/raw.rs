//! Raw stop records as they appear in timetable sources.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One stop record, before validation.
///
/// Field names follow the source data (`Station_Code`, `Arrival_Time`, ...);
/// snake_case spellings are accepted too. Any field may be missing, and
/// numbers are accepted where strings are expected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStop {
    #[serde(rename = "Train_No", alias = "train_no", default, deserialize_with = "lenient")]
    pub train_no: String,

    #[serde(rename = "Train_Name", alias = "train_name", default, deserialize_with = "lenient")]
    pub train_name: String,

    #[serde(rename = "Station_Code", alias = "station_code", default, deserialize_with = "lenient")]
    pub station_code: String,

    #[serde(rename = "Station_Name", alias = "station_name", default, deserialize_with = "lenient")]
    pub station_name: String,

    #[serde(rename = "Arrival_Time", alias = "arrival", default, deserialize_with = "lenient")]
    pub arrival: String,

    #[serde(rename = "Departure_Time", alias = "departure", default, deserialize_with = "lenient")]
    pub departure: String,
}

/// Accept strings, numbers and booleans as text; anything else is empty.
fn lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Trim whitespace and drop stray quote characters.
///
/// Train numbers and times in the source are often wrapped in `'...'`.
pub fn clean_key(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| *c != '\'' && *c != '"')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Canonical comparison form of a station name.
pub fn clean_name(s: &str) -> String {
    s.trim().to_uppercase()
}

/// Name of a JSON value's type, for diagnostics.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_source_field_names() {
        let stop: RawStop = serde_json::from_value(json!({
            "Train_No": "'12621'",
            "Train_Name": "TAMIL NADU EXP",
            "Station_Code": "MAS",
            "Station_Name": "Chennai Central",
            "Arrival_Time": "Source",
            "Departure_Time": "'22:00:00'"
        }))
        .unwrap();

        assert_eq!(stop.train_no, "'12621'");
        assert_eq!(stop.station_code, "MAS");
        assert_eq!(stop.departure, "'22:00:00'");
    }

    #[test]
    fn deserializes_snake_case_and_numbers() {
        let stop: RawStop = serde_json::from_value(json!({
            "train_no": 101,
            "station_code": "a",
            "station_name": "Alpha",
        }))
        .unwrap();

        assert_eq!(stop.train_no, "101");
        assert_eq!(stop.station_code, "a");
        assert_eq!(stop.arrival, "");
    }

    #[test]
    fn null_fields_become_empty() {
        let stop: RawStop = serde_json::from_value(json!({
            "Station_Code": null,
            "Station_Name": ["not", "a", "name"]
        }))
        .unwrap();

        assert_eq!(stop.station_code, "");
        assert_eq!(stop.station_name, "");
    }

    #[test]
    fn clean_key_strips_quotes() {
        assert_eq!(clean_key(" '12621' "), "12621");
        assert_eq!(clean_key("\"06:00:00\""), "06:00:00");
        assert_eq!(clean_key("' '"), "");
    }

    #[test]
    fn clean_name_uppercases() {
        assert_eq!(clean_name("  New Delhi "), "NEW DELHI");
    }
}
