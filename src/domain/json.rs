//! Readers for untrusted JSON input.
//!
//! Presence follows JavaScript truthiness: absent, `null`, `""`, `0` and
//! `false` all count as missing. Strings are taken verbatim; any other
//! present value is taken as its JSON text.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::{Number, Value};

use super::error::EntityError;

/// Read a truthy value as text.
pub(crate) fn text(props: &Value, key: &str) -> Option<String> {
    match props.get(key).filter(|v| is_truthy(v))? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn is_zero(n: &Number) -> bool {
    n.as_f64().map_or(false, |f| f == 0.0)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => !is_zero(n),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Parse a date value: RFC 3339, naive ISO date-time (UTC), bare date, or epoch millis.
pub(crate) fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_date_str(s),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Field reader used by entity reconstruction.
pub(crate) struct Fields<'a> {
    entity: &'static str,
    json: &'a Value,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(entity: &'static str, json: &'a Value) -> Self {
        Self { entity, json }
    }

    fn present(&self, field: &str) -> Option<&'a Value> {
        self.json.get(field).filter(|v| is_truthy(v))
    }

    pub(crate) fn required(&self, field: &'static str) -> Result<String, EntityError> {
        text(self.json, field).ok_or(EntityError::MissingField {
            entity: self.entity,
            field,
        })
    }

    pub(crate) fn optional(&self, field: &str) -> Option<String> {
        text(self.json, field)
    }

    pub(crate) fn required_date(&self, field: &'static str) -> Result<DateTime<Utc>, EntityError> {
        self.optional_date(field)?.ok_or(EntityError::MissingField {
            entity: self.entity,
            field,
        })
    }

    pub(crate) fn optional_date(
        &self,
        field: &'static str,
    ) -> Result<Option<DateTime<Utc>>, EntityError> {
        match self.present(field) {
            None => Ok(None),
            Some(value) => parse_date(value).map(Some).ok_or(EntityError::InvalidDate {
                entity: self.entity,
                field,
            }),
        }
    }

    /// Boolean flag, `false` unless the value is truthy.
    pub(crate) fn flag(&self, field: &str) -> bool {
        self.present(field).is_some()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Datelike;
    use serde_json::json;

    use super::*;

    #[test]
    fn text_follows_truthiness() {
        let props = json!({
            "s": "value",
            "empty": "",
            "zero": 0,
            "num": 42,
            "null": null,
            "bool": true,
            "obj": {"a": 1},
        });

        assert_eq!(text(&props, "s").as_deref(), Some("value"));
        assert_eq!(text(&props, "num").as_deref(), Some("42"));
        assert_eq!(text(&props, "bool").as_deref(), Some("true"));
        assert_eq!(text(&props, "obj").as_deref(), Some(r#"{"a":1}"#));
        assert_eq!(text(&props, "empty"), None);
        assert_eq!(text(&props, "zero"), None);
        assert_eq!(text(&props, "null"), None);
        assert_eq!(text(&props, "missing"), None);
    }

    #[test]
    fn falsy_values_of_every_type_are_absent() {
        let props = json!({"f": false, "z": 0.0, "s": ""});
        assert_eq!(text(&props, "f"), None);
        assert_eq!(text(&props, "z"), None);
        assert_eq!(text(&props, "s"), None);
        assert_eq!(text(&json!({"arr": []}), "arr").as_deref(), Some("[]"));
    }

    #[test]
    fn text_on_non_object_input_is_absent() {
        assert_eq!(text(&json!([1, 2]), "id"), None);
        assert_eq!(text(&json!("id"), "id"), None);
    }

    #[test]
    fn parses_supported_date_shapes() {
        let expected = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();

        assert_eq!(parse_date(&json!("2023-01-01T00:00:00.000Z")), Some(expected));
        assert_eq!(parse_date(&json!("2023-01-01T02:00:00+02:00")), Some(expected));
        assert_eq!(parse_date(&json!("2023-01-01T00:00:00")), Some(expected));
        assert_eq!(parse_date(&json!("2023-01-01 00:00:00.000")), Some(expected));
        assert_eq!(parse_date(&json!("2023-01-01")), Some(expected));
        assert_eq!(parse_date(&json!(expected.timestamp_millis())), Some(expected));
    }

    #[test]
    fn rejects_unparseable_dates() {
        assert_eq!(parse_date(&json!("invalid-date")), None);
        assert_eq!(parse_date(&json!("2023-13-45")), None);
        assert_eq!(parse_date(&json!(true)), None);
        assert_eq!(parse_date(&json!({"year": 2023})), None);
    }

    #[test]
    fn optional_date_absent_is_none() {
        let json = json!({"deletedAt": null, "blank": ""});
        let fields = Fields::new("Test", &json);
        assert_eq!(fields.optional_date("deletedAt").unwrap(), None);
        assert_eq!(fields.optional_date("blank").unwrap(), None);
        assert_eq!(fields.optional_date("missing").unwrap(), None);
    }

    #[test]
    fn required_date_distinguishes_missing_from_invalid() {
        let json = json!({"createdAt": "not-a-date"});
        let fields = Fields::new("Test", &json);

        assert_eq!(
            fields.required_date("createdAt"),
            Err(EntityError::InvalidDate {
                entity: "Test",
                field: "createdAt"
            })
        );
        assert_eq!(
            fields.required_date("updatedAt"),
            Err(EntityError::MissingField {
                entity: "Test",
                field: "updatedAt"
            })
        );
    }

    #[test]
    fn flag_defaults_to_false() {
        let json = json!({"deleted": true, "nulled": null});
        let fields = Fields::new("Test", &json);
        assert!(fields.flag("deleted"));
        assert!(!fields.flag("nulled"));
        assert!(!fields.flag("missing"));
    }

    #[test]
    fn fractional_epoch_millis_are_truncated() {
        let parsed = parse_date(&json!(1.7e12)).unwrap();
        assert_eq!(parsed.timestamp_millis(), 1_700_000_000_000);

        let parsed = parse_date(&json!(1_672_531_200_123.9)).unwrap();
        assert_eq!(parsed.timestamp_millis(), 1_672_531_200_123);
    }

    #[test]
    fn epoch_millis_dates_keep_precision() {
        let parsed = parse_date(&json!(1_672_531_200_123_i64)).unwrap();
        assert_eq!(parsed.year(), 2023);
        assert_eq!(parsed.timestamp_millis(), 1_672_531_200_123);
    }
}
