//! Lenient request body handling for automation-platform payloads.
//!
//! Webhook senders are generic automation tools: some post JSON, some
//! post URL-encoded forms, some post nothing at all, and field names
//! vary (`value1` vs `username`). [`LooseBody`] normalizes all of these
//! into a JSON object, and [`first_present`] picks the first usable
//! field out of an ordered list of candidate names.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{Form, FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use serde_json::{Map, Value};
use spinwheel_core::number_text;

use crate::error::GatewayError;

/// A request body normalized to a JSON object.
///
/// - `application/x-www-form-urlencoded` bodies become string fields
/// - empty bodies and non-object JSON become an empty object
/// - malformed JSON is rejected with `400`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LooseBody(pub Map<String, Value>);

impl LooseBody {
    /// Raw value of a field, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// First usable value among `names`; see [`first_present`].
    pub fn first_present(&self, names: &[&str]) -> Option<String> {
        first_present(&self.0, names)
    }
}

impl<S> FromRequest<S> for LooseBody
where
    S: Send + Sync,
{
    type Rejection = GatewayError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| GatewayError::BadRequest(e.body_text()))?;
            return Ok(Self(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::String(v)))
                    .collect(),
            ));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| GatewayError::BadRequest(e.body_text()))?;
        parse_json_object(&bytes).map(Self)
    }
}

fn parse_json_object(bytes: &[u8]) -> Result<Map<String, Value>, GatewayError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Ok(Map::new()),
        Err(e) => Err(GatewayError::BadRequest(format!("invalid JSON body: {e}"))),
    }
}

/// Return the first of `names` whose value is usable as text.
///
/// Non-empty strings are returned as-is and non-zero numbers are
/// stringified. Empty strings, `0`, `false`, `null`, arrays and objects
/// count as absent, so the next name is tried.
pub fn first_present(fields: &Map<String, Value>, names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| fields.get(*name))
        .find_map(as_text)
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => Some(number_text(n)),
        Value::Bool(true) => Some(String::from("true")),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use axum::body::Body;
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn first_present_prefers_earlier_names() {
        let fields = object(json!({"value1": "alice", "username": "bob"}));
        assert_eq!(first_present(&fields, &["value1", "username"]).as_deref(), Some("alice"));
    }

    #[test]
    fn first_present_skips_falsy_values() {
        let fields = object(json!({"value1": "", "username": "bob", "value3": null, "sku": 0}));
        assert_eq!(first_present(&fields, &["value1", "username"]).as_deref(), Some("bob"));
        assert_eq!(first_present(&fields, &["value3", "sku"]), None);
        assert_eq!(first_present(&fields, &["missing"]), None);
    }

    #[test]
    fn first_present_stringifies_numbers() {
        let fields = object(json!({"sku": 42}));
        assert_eq!(first_present(&fields, &["sku"]).as_deref(), Some("42"));

        let fields = object(json!({"sku": 1.0, "value2": 2.5}));
        assert_eq!(first_present(&fields, &["sku"]).as_deref(), Some("1"));
        assert_eq!(first_present(&fields, &["value2"]).as_deref(), Some("2.5"));
    }

    #[test]
    fn json_body_edge_cases() {
        assert_eq!(parse_json_object(b"").unwrap(), Map::new());
        assert_eq!(parse_json_object(b"  \n").unwrap(), Map::new());
        assert_eq!(parse_json_object(b"[1,2]").unwrap(), Map::new());
        assert_eq!(parse_json_object(br#"{"a":1}"#).unwrap(), object(json!({"a": 1})));
        assert!(parse_json_object(b"{not json").is_err());
    }

    #[tokio::test]
    async fn extracts_form_bodies() {
        let req = axum::http::Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("value1=carol&value3=SKU_B"))
            .unwrap();

        let body = LooseBody::from_request(req, &()).await.unwrap();
        assert_eq!(body.first_present(&["value1"]).as_deref(), Some("carol"));
        assert_eq!(body.get("value3"), Some(&json!("SKU_B")));
    }

    #[tokio::test]
    async fn extracts_json_without_content_type() {
        let req = axum::http::Request::builder()
            .method("POST")
            .body(Body::from(r#"{"username":"dan"}"#))
            .unwrap();

        let body = LooseBody::from_request(req, &()).await.unwrap();
        assert_eq!(body.first_present(&["value1", "username"]).as_deref(), Some("dan"));
    }
}
