//! Outcome normalization
//!
//! Post-processing of raw control-plane responses before they reach the
//! caller: identifier coercion, VPC name enrichment and notice-alarm lookup.

use serde_json::Value;
use tracing::warn;

use amqpctl_common::{Error, Record, ResourceKind, Result};

use crate::record::string_attr;

/// Alarm type that exists exactly once per instance and is adopted, never created
pub const NOTICE_ALARM: &str = "notice";

/// Canonical string form of a control-plane identifier.
///
/// Numbers (which arrive as floats, e.g. `12345.0`) become fixed-point
/// strings without a decimal point or exponent. A string of ASCII digits is
/// already canonical. Anything else is [`Error::MissingIdentifier`].
pub fn canonical_id(kind: ResourceKind, value: Option<&Value>) -> Result<String> {
    match value {
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                return Ok(i.to_string());
            }
            if let Some(u) = n.as_u64() {
                return Ok(u.to_string());
            }
            match n.as_f64() {
                Some(f) if f.is_finite() => Ok(format!("{:.0}", f)),
                _ => Err(missing(kind, value)),
            }
        }
        Some(Value::String(s)) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            Ok(s.clone())
        }
        _ => Err(missing(kind, value)),
    }
}

fn missing(kind: ResourceKind, value: Option<&Value>) -> Error {
    Error::MissingIdentifier {
        kind: kind.to_string(),
        value: value
            .map(Value::to_string)
            .unwrap_or_else(|| "<missing>".to_string()),
    }
}

/// Rewrite the record's `id` in canonical form; the id is required
pub fn normalize_id(kind: ResourceKind, record: &mut Record) -> Result<String> {
    let id = canonical_id(kind, record.get("id"))?;
    record.insert("id".to_string(), Value::String(id.clone()));
    Ok(id)
}

/// Rewrite the record's `id` in canonical form when it has one
pub fn coerce_id(kind: ResourceKind, record: &mut Record) -> Result<()> {
    if record.contains_key("id") {
        normalize_id(kind, record)?;
    }
    Ok(())
}

/// A record plus the reason it may be incomplete
#[derive(Debug)]
pub struct Enriched {
    pub record: Record,
    /// Set when a secondary lookup failed and its fields are missing
    pub degraded: Option<Error>,
}

impl Enriched {
    pub fn complete(record: Record) -> Self {
        Self {
            record,
            degraded: None,
        }
    }

    pub fn is_partial(&self) -> bool {
        self.degraded.is_some()
    }

    pub fn into_record(self) -> Record {
        self.record
    }
}

/// Merge the peering-info `name` into a VPC record as `vpc_name`.
///
/// A failed lookup does not fail the read; the record comes back without
/// `vpc_name` and the lookup error is carried in `degraded`.
pub fn enrich_vpc(mut record: Record, lookup: Result<Record>) -> Enriched {
    match lookup {
        Ok(info) => {
            if let Some(name) = info.get("name").filter(|v| !v.is_null()) {
                record.insert("vpc_name".to_string(), name.clone());
            }
            Enriched::complete(record)
        }
        Err(e) => {
            warn!("VPC name lookup failed, returning record without vpc_name: {}", e);
            Enriched {
                record,
                degraded: Some(e),
            }
        }
    }
}

/// Identifier of the instance's notice alarm
pub fn find_notice_alarm(instance_id: i64, alarms: &[Record]) -> Result<String> {
    alarms
        .iter()
        .find(|alarm| string_attr(alarm, "type") == Some(NOTICE_ALARM))
        .ok_or(Error::NoticeAlarmNotFound { instance_id })
        .and_then(|alarm| canonical_id(ResourceKind::Alarm, alarm.get("id")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::make_record;
    use serde_json::json;

    fn parsed(raw: &str) -> Value {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_float_identifiers_have_no_point_or_exponent() {
        for (raw, expected) in [
            ("12345.0", "12345"),
            ("12345", "12345"),
            ("1.0e3", "1000"),
            ("1e21", "1000000000000000000000"),
        ] {
            let id = canonical_id(ResourceKind::Vpc, Some(&parsed(raw))).unwrap();
            assert_eq!(id, expected);
            assert!(!id.contains('.'));
            assert!(!id.contains('e'));
        }
    }

    #[test]
    fn test_digit_string_is_canonical() {
        let id = canonical_id(ResourceKind::Alarm, Some(&json!("1002"))).unwrap();
        assert_eq!(id, "1002");
    }

    #[test]
    fn test_missing_or_non_numeric_identifier_is_error() {
        assert!(matches!(
            canonical_id(ResourceKind::Vpc, None),
            Err(Error::MissingIdentifier { .. })
        ));
        for bad in [json!("abc"), json!(""), json!(null), json!({"id": 1}), json!(true)] {
            assert!(canonical_id(ResourceKind::Vpc, Some(&bad)).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_normalize_id_rewrites_record() {
        let mut record = make_record(vec![("id", parsed("77.0")), ("name", json!("vpc"))]);
        assert_eq!(normalize_id(ResourceKind::Vpc, &mut record).unwrap(), "77");
        assert_eq!(record["id"], json!("77"));

        let mut without = make_record(vec![("name", json!("vpc"))]);
        assert!(normalize_id(ResourceKind::Vpc, &mut without).is_err());
        assert!(coerce_id(ResourceKind::Vpc, &mut without).is_ok());
    }

    #[test]
    fn test_enrich_vpc_merges_name() {
        let record = make_record(vec![("id", json!("7")), ("subnet", json!("10.56.72.0/24"))]);
        let info = make_record(vec![("name", json!("prod-vpc"))]);

        let enriched = enrich_vpc(record, Ok(info));
        assert!(!enriched.is_partial());
        assert_eq!(enriched.record["vpc_name"], json!("prod-vpc"));
    }

    #[test]
    fn test_enrich_vpc_degrades_on_lookup_failure() {
        let record = make_record(vec![("id", json!("7"))]);
        let lookup = Err(Error::Api {
            operation: "lookup vpc".to_string(),
            status: 500,
            body: json!({"error": "boom"}),
        });

        let enriched = enrich_vpc(record, lookup);
        assert!(enriched.is_partial());
        assert!(!enriched.record.contains_key("vpc_name"));
        assert_eq!(enriched.degraded.and_then(|e| e.status()), Some(500));
    }

    #[test]
    fn test_find_notice_alarm() {
        let alarms = vec![
            make_record(vec![("id", parsed("1001.0")), ("type", json!("cpu"))]),
            make_record(vec![("id", parsed("1002.0")), ("type", json!("notice"))]),
        ];
        assert_eq!(find_notice_alarm(42, &alarms).unwrap(), "1002");
    }

    #[test]
    fn test_find_notice_alarm_names_instance_when_missing() {
        let alarms = vec![make_record(vec![("id", json!(1001)), ("type", json!("cpu"))])];
        let err = find_notice_alarm(42, &alarms).unwrap_err();
        assert!(matches!(err, Error::NoticeAlarmNotFound { instance_id: 42 }));
    }
}
