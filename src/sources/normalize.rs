//! Provider response normalizers
//!
//! Each provider answers in its own JSON dialect; these turn a response body
//! into the internal [`Payload`] or fail with [`FetchError::Shape`].

use super::Payload;
use crate::network::FetchError;
use serde_json::{Map, Value};

/// The response dialect a source speaks.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseFormat {
    /// World Bank indicator API: `[meta, [{"date": "2023", "value": 1.0}, ...]]`, newest first.
    WorldBank { metric: String },
    /// SDMX-JSON data message (OECD, most national statistics offices).
    SdmxJson { metric: String },
    /// A record or list of records with numeric fields. An empty field list keeps every numeric field.
    FlatRecords { fields: Vec<String> },
}

impl ResponseFormat {
    pub fn normalize(&self, body: &Value) -> Result<Payload, FetchError> {
        match self {
            ResponseFormat::WorldBank { metric } => world_bank(body, metric),
            ResponseFormat::SdmxJson { metric } => sdmx_json(body, metric),
            ResponseFormat::FlatRecords { fields } => flat_records(body, fields),
        }
    }
}

fn change_pct(latest: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    Some((latest - previous) / previous.abs() * 100.0)
}

fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

fn as_period(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn world_bank(body: &Value, metric: &str) -> Result<Payload, FetchError> {
    let parts = body
        .as_array()
        .ok_or_else(|| FetchError::shape("expected a two-element array"))?;

    // Errors come back as `[{"message": [{"key": ..., "value": ...}]}]` with status 200.
    if let Some(messages) = parts.first().and_then(|meta| meta.get("message")) {
        let detail = messages
            .get(0)
            .and_then(|m| m.get("value"))
            .and_then(Value::as_str)
            .unwrap_or("provider returned an error message");
        return Err(FetchError::shape(detail));
    }

    let rows = parts
        .get(1)
        .and_then(Value::as_array)
        .ok_or_else(|| FetchError::shape("missing data rows"))?;

    let mut observed = rows.iter().filter_map(|row| {
        let value = row.get("value").and_then(as_number)?;
        Some((row.get("date").and_then(as_period), value))
    });

    let (period, latest) = observed
        .next()
        .ok_or_else(|| FetchError::shape("no non-empty observations"))?;

    let mut payload = Payload::new(period).with_metric(metric, latest);
    if let Some(pct) = observed.next().and_then(|(_, prev)| change_pct(latest, prev)) {
        payload = payload.with_metric(format!("{}_change_pct", metric), pct);
    }
    Ok(payload)
}

pub fn sdmx_json(body: &Value, metric: &str) -> Result<Payload, FetchError> {
    // SDMX-JSON 2.0 wraps everything in "data"; 1.0 puts it at the top level.
    let root = body.get("data").unwrap_or(body);

    let series = root
        .get("dataSets")
        .and_then(|sets| sets.get(0))
        .and_then(|set| set.get("series"))
        .and_then(Value::as_object)
        .ok_or_else(|| FetchError::shape("missing dataSets[0].series"))?;

    let observations = series
        .values()
        .find_map(|s| s.get("observations").and_then(Value::as_object))
        .ok_or_else(|| FetchError::shape("no series with observations"))?;

    let mut indexed: Vec<(usize, f64)> = observations
        .iter()
        .filter_map(|(key, obs)| {
            let index = key.parse::<usize>().ok()?;
            let value = obs.get(0).and_then(as_number)?;
            Some((index, value))
        })
        .collect();
    indexed.sort_by_key(|(index, _)| *index);

    let (last_index, latest) = *indexed
        .last()
        .ok_or_else(|| FetchError::shape("no numeric observations"))?;

    let period = sdmx_structure(root, body)
        .and_then(|s| s.get("dimensions"))
        .and_then(|d| d.get("observation"))
        .and_then(|o| o.get(0))
        .and_then(|dim| dim.get("values"))
        .and_then(|values| values.get(last_index))
        .and_then(|v| v.get("id").or_else(|| v.get("name")))
        .and_then(as_period);

    let mut payload = Payload::new(period).with_metric(metric, latest);
    if indexed.len() >= 2 {
        let (_, previous) = indexed[indexed.len() - 2];
        if let Some(pct) = change_pct(latest, previous) {
            payload = payload.with_metric(format!("{}_change_pct", metric), pct);
        }
    }
    Ok(payload)
}

/// 1.0 carries a single `structure`; 2.0 carries a `structures` list.
fn sdmx_structure<'a>(root: &'a Value, body: &'a Value) -> Option<&'a Value> {
    [root, body].into_iter().find_map(|v| {
        v.get("structure")
            .or_else(|| v.get("structures").and_then(|list| list.get(0)))
    })
}

const RECORD_LIST_KEYS: [&str; 4] = ["data", "records", "results", "result"];
const PERIOD_KEYS: [&str; 4] = ["period", "date", "month", "year"];

fn first_record(body: &Value) -> Option<&Map<String, Value>> {
    match body {
        Value::Array(items) => items.first().and_then(first_record),
        Value::Object(map) => {
            for key in RECORD_LIST_KEYS {
                if let Some(nested) = map.get(key) {
                    if nested.is_array() || nested.is_object() {
                        return first_record(nested);
                    }
                }
            }
            Some(map)
        }
        _ => None,
    }
}

pub fn flat_records(body: &Value, fields: &[String]) -> Result<Payload, FetchError> {
    let record = first_record(body).ok_or_else(|| FetchError::shape("no record found"))?;

    let period = PERIOD_KEYS
        .iter()
        .find_map(|key| record.get(*key).and_then(as_period));

    let mut payload = Payload::new(period);
    if fields.is_empty() {
        for (key, value) in record {
            if PERIOD_KEYS.contains(&key.as_str()) {
                continue;
            }
            if let Value::Number(n) = value {
                if let Some(v) = n.as_f64() {
                    payload = payload.with_metric(key.clone(), v);
                }
            }
        }
    } else {
        for field in fields {
            if let Some(v) = record.get(field).and_then(as_number) {
                payload = payload.with_metric(field.clone(), v);
            }
        }
    }

    if payload.metrics.is_empty() {
        return Err(FetchError::shape("record has no numeric fields"));
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    // Newest non-null row wins and the change is computed against the next one.
    fn test_world_bank_skips_null_rows() {
        let body = json!([
            {"page": 1, "pages": 1, "total": 3},
            [
                {"date": "2024", "value": null},
                {"date": "2023", "value": 110.0},
                {"date": "2022", "value": 100.0}
            ]
        ]);
        let payload = world_bank(&body, "exports_usd").unwrap();
        assert_eq!(payload.period.as_deref(), Some("2023"));
        assert_eq!(payload.metric("exports_usd"), Some(110.0));
        let pct = payload.metric("exports_usd_change_pct").unwrap();
        assert!((pct - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_world_bank_error_message_is_shape_error() {
        let body = json!([{"message": [{"id": "120", "key": "Invalid value", "value": "The provided parameter value is not valid"}]}]);
        let err = world_bank(&body, "exports_usd").unwrap_err();
        assert!(matches!(err, FetchError::Shape(msg) if msg.contains("not valid")));
    }

    #[test]
    fn test_world_bank_all_null_is_error() {
        let body = json!([{"page": 1}, [{"date": "2024", "value": null}]]);
        assert!(world_bank(&body, "exports_usd").is_err());
    }

    #[test]
    fn test_sdmx_takes_last_observation_and_period() {
        let body = json!({
            "data": {
                "dataSets": [{
                    "series": {
                        "0:0:0": {"observations": {"0": [99.0], "1": [99.5], "10": [100.0]}}
                    }
                }],
                "structure": {
                    "dimensions": {
                        "observation": [{
                            "id": "TIME_PERIOD",
                            "values": [
                                {"id": "2024-01"}, {"id": "2024-02"}, {"id": "2024-03"},
                                {"id": "2024-04"}, {"id": "2024-05"}, {"id": "2024-06"},
                                {"id": "2024-07"}, {"id": "2024-08"}, {"id": "2024-09"},
                                {"id": "2024-10"}, {"id": "2024-11"}
                            ]
                        }]
                    }
                }
            }
        });
        let payload = sdmx_json(&body, "leading_indicator").unwrap();
        assert_eq!(payload.metric("leading_indicator"), Some(100.0));
        assert_eq!(payload.period.as_deref(), Some("2024-11"));
        assert!(payload.metric("leading_indicator_change_pct").is_some());
    }

    #[test]
    fn test_sdmx_v1_top_level_layout() {
        let body = json!({
            "dataSets": [{"series": {"0": {"observations": {"0": ["3.8"]}}}}]
        });
        let payload = sdmx_json(&body, "cpi").unwrap();
        assert_eq!(payload.metric("cpi"), Some(3.8));
        assert_eq!(payload.period, None);
    }

    #[test]
    // 2.0 messages list their structure under `structures`.
    fn test_sdmx_v2_structures_list_gives_period() {
        let body = json!({
            "data": {
                "dataSets": [{"series": {"0:0": {"observations": {"0": [3.6], "1": [3.8]}}}}],
                "structures": [{
                    "dimensions": {
                        "observation": [{
                            "id": "TIME_PERIOD",
                            "values": [{"id": "2024-Q2"}, {"id": "2024-Q3"}]
                        }]
                    }
                }]
            }
        });
        let payload = sdmx_json(&body, "cpi").unwrap();
        assert_eq!(payload.metric("cpi"), Some(3.8));
        assert_eq!(payload.period.as_deref(), Some("2024-Q3"));
    }

    #[test]
    fn test_sdmx_without_series_is_error() {
        assert!(sdmx_json(&json!({"dataSets": []}), "cpi").is_err());
    }

    #[test]
    fn test_flat_records_nested_list_and_field_selection() {
        let body = json!({
            "records": [
                {"month": "2024-05", "teu": "1,250", "vessel_calls": 310, "note": "ok"},
                {"month": "2024-04", "teu": 1200, "vessel_calls": 300}
            ]
        });
        let fields = vec!["teu".to_string(), "vessel_calls".to_string()];
        let payload = flat_records(&body, &fields).unwrap();
        assert_eq!(payload.period.as_deref(), Some("2024-05"));
        assert_eq!(payload.metric("teu"), Some(1250.0));
        assert_eq!(payload.metric("vessel_calls"), Some(310.0));
    }

    #[test]
    fn test_flat_records_keeps_all_numeric_fields_by_default() {
        let body = json!({"year": 2024, "teu": 10.0, "berths": 4, "name": "North"});
        let payload = flat_records(&body, &[]).unwrap();
        assert_eq!(payload.metrics.len(), 2);
        assert_eq!(payload.period.as_deref(), Some("2024"));
    }

    #[test]
    // "NaN" and "inf" parse as floats but are not data.
    fn test_non_finite_values_are_rejected() {
        let fields = vec![
            "teu".to_string(),
            "vessel_calls".to_string(),
            "bulk_tonnes".to_string(),
        ];
        let body = json!({"teu": "NaN", "vessel_calls": 310, "bulk_tonnes": "inf"});
        let payload = flat_records(&body, &fields).unwrap();
        assert_eq!(payload.metrics.len(), 1);
        assert_eq!(payload.metric("teu"), None);
        assert_eq!(payload.metric("bulk_tonnes"), None);

        assert!(flat_records(&json!({"teu": "-inf"}), &fields).is_err());
        assert_eq!(as_number(&json!("NaN")), None);
        assert_eq!(as_number(&json!("2.5")), Some(2.5));
    }

    #[test]
    fn test_flat_records_without_numbers_is_error() {
        assert!(flat_records(&json!([{"name": "North"}]), &[]).is_err());
        assert!(flat_records(&json!("text"), &[]).is_err());
    }
}
