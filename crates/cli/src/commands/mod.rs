//! CLI Commands

pub mod alarm;
pub mod plugin;
pub mod vpc;

use anyhow::{bail, Result};
use serde_json::Value;

use amqpctl_common::Params;

/// Parse repeated `key=value` pairs into request parameters.
///
/// Values that parse as JSON keep their type (`90`, `true`, `[1,2]`);
/// anything else is sent as a string.
pub fn parse_params(pairs: &[String]) -> Result<Params> {
    let mut params = Params::new();
    for pair in pairs {
        let Some((key, raw)) = pair.split_once('=') else {
            bail!("expected key=value, got '{}'", pair);
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("empty key in '{}'", pair);
        }
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        params.insert(key.to_string(), value);
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_params_keeps_json_types() {
        let params = parse_params(&[
            "type=cpu".to_string(),
            "value_threshold=90".to_string(),
            "enabled=true".to_string(),
            "recipients=[1,2]".to_string(),
            "queue_regex=.*".to_string(),
        ])
        .unwrap();

        assert_eq!(params["type"], json!("cpu"));
        assert_eq!(params["value_threshold"], json!(90));
        assert_eq!(params["enabled"], json!(true));
        assert_eq!(params["recipients"], json!([1, 2]));
        assert_eq!(params["queue_regex"], json!(".*"));
    }

    #[test]
    fn test_parse_params_rejects_malformed_pairs() {
        assert!(parse_params(&["novalue".to_string()]).is_err());
        assert!(parse_params(&["=90".to_string()]).is_err());
    }
}
