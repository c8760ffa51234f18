use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body posted to the login endpoint.
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// User record returned by the login endpoint.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub token: Option<String>,
}

/// Whether a listing response body carries a truthy `success` field.
pub fn reports_success(body: &Value) -> bool {
    body.get("success").is_some_and(is_truthy)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_flag_truthiness() {
        assert!(reports_success(&json!({"success": true})));
        assert!(reports_success(&json!({"success": 1, "id": "x"})));
        assert!(reports_success(&json!({"success": "yes"})));

        assert!(!reports_success(&json!({"success": false})));
        assert!(!reports_success(&json!({"success": 0})));
        assert!(!reports_success(&json!({"success": ""})));
        assert!(!reports_success(&json!({"success": null})));
        assert!(!reports_success(&json!({"ok": true})));
        assert!(!reports_success(&json!([true])));
    }
}
