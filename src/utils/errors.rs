use serde_json::Value;

/// Extract user-facing messages from a rejected request body.
///
/// The API wraps errors in a per-endpoint envelope:
/// `{"verify_otp": {"non_field_errors": ["Invalid OTP"]}}`
///
/// `non_field_errors` wins when present. Otherwise field messages are returned
/// as `field: message`, and finally a bare `detail` or `message` string.
pub fn rejection_messages(body: &Value, envelope: Option<&str>) -> Vec<String> {
    let scope = envelope
        .and_then(|key| body.get(key))
        .filter(|inner| inner.is_object())
        .unwrap_or(body);

    let general = string_list(scope.get("non_field_errors"));
    if !general.is_empty() {
        return general;
    }

    let mut fields = Vec::new();
    if let Some(map) = scope.as_object() {
        for (field, value) in map {
            if field == "detail" || field == "message" || field == "status_code" {
                continue;
            }
            for message in string_list(Some(value)) {
                fields.push(format!("{}: {}", field, message));
            }
        }
    }
    if !fields.is_empty() {
        return fields;
    }

    [scope, body]
        .iter()
        .find_map(|v| {
            v.get("detail")
                .or_else(|| v.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .into_iter()
        .collect()
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_field_errors_in_envelope() {
        let body = json!({"verify_otp": {"non_field_errors": ["Invalid OTP", "Try again"]}});
        assert_eq!(
            rejection_messages(&body, Some("verify_otp")),
            vec!["Invalid OTP", "Try again"]
        );
    }

    #[test]
    fn test_field_errors_fallback() {
        let body = json!({"initiate_transfer": {"amount": ["Ensure this value is positive."]}});
        assert_eq!(
            rejection_messages(&body, Some("initiate_transfer")),
            vec!["amount: Ensure this value is positive."]
        );
    }

    #[test]
    fn test_detail_fallback() {
        let body = json!({"detail": "Authentication credentials were not provided."});
        assert_eq!(
            rejection_messages(&body, Some("verify_otp")),
            vec!["Authentication credentials were not provided."]
        );
        assert!(rejection_messages(&json!("oops"), None).is_empty());
    }
}
