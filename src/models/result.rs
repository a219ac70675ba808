use serde::{Deserialize, Serialize};

/// Response envelope for expected failures.
///
/// Carries either `data` or an `error` string; callers branch on `success`
/// instead of on HTTP status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResult<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(self
                .error
                .unwrap_or_else(|| "Request failed without an error message".to_string())),
        }
    }
}

impl ApiResult<()> {
    /// Bare acknowledgement: `{"success": true}`.
    pub fn ack() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::DeserializeOwned;

    #[derive(Debug, PartialEq, Deserialize)]
    struct NoDefault {
        key: String,
    }

    fn decode<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
        serde_json::from_str(body).expect("valid envelope")
    }

    #[test]
    fn decodes_for_any_payload_type() {
        let ok: ApiResult<NoDefault> = decode(r#"{"success":true,"data":{"key":"PROJ-1"}}"#);
        assert_eq!(
            ok.into_result(),
            Ok(NoDefault {
                key: "PROJ-1".to_string()
            })
        );

        let failed: ApiResult<NoDefault> = decode(r#"{"success":false,"error":"nope"}"#);
        assert!(failed.data.is_none());
        assert_eq!(failed.into_result(), Err("nope".to_string()));
    }

    #[test]
    fn ack_omits_data_and_error() {
        let value = serde_json::to_value(ApiResult::ack()).expect("serializes");
        assert_eq!(value, serde_json::json!({ "success": true }));
    }
}
