//! ResponseEnvelope - remote handler の戻り値の wire 契約
//!
//! remote invocation の結果は `Response` フィールドを持つ mapping でなければならない。
//! 欠けている場合は ProtocolError（soft な outcome ではない）。

use serde_json::Value;

use super::errors::InvokerError;
use super::operation::OperationKind;

/// envelope の必須フィールド名
pub const RESPONSE_FIELD: &str = "Response";

/// 検証前の remote invocation 結果
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    raw: Value,
}

impl ResponseEnvelope {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// `Response` の中身を取り出す
    ///
    /// mapping でない / `Response` が無い場合は ProtocolError。
    /// メッセージには生の結果をそのまま含める。
    pub fn into_response(self, operation: OperationKind) -> Result<Value, InvokerError> {
        match self.raw {
            Value::Object(mut map) if map.contains_key(RESPONSE_FIELD) => {
                Ok(map.remove(RESPONSE_FIELD).unwrap_or(Value::Null))
            }
            raw => Err(InvokerError::Protocol(format!(
                "{} response does not contain a response: {}",
                operation.label(),
                raw
            ))),
        }
    }
}

impl From<Value> for ResponseEnvelope {
    fn from(raw: Value) -> Self {
        Self::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unwraps_response_field() {
        let env = ResponseEnvelope::new(json!({ "Response": { "Status": "ok" }, "Extra": 1 }));
        let response = env.into_response(OperationKind::ComponentCompile).unwrap();
        assert_eq!(response, json!({ "Status": "ok" }));
    }

    #[test]
    fn null_response_is_still_a_response() {
        let env = ResponseEnvelope::new(json!({ "Response": null }));
        assert_eq!(env.into_response(OperationKind::Run).unwrap(), Value::Null);
    }

    #[test]
    fn missing_response_is_protocol_error_with_raw_result() {
        let env = ResponseEnvelope::new(json!({ "Result": "ok" }));
        let err = env.into_response(OperationKind::Run).unwrap_err();
        assert!(matches!(err, InvokerError::Protocol(_)));
        assert_eq!(
            err.to_string(),
            r#"Runner response does not contain a response: {"Result":"ok"}"#
        );
    }

    #[test]
    fn non_mapping_result_is_protocol_error() {
        let env = ResponseEnvelope::new(json!(["Response"]));
        let err = env.into_response(OperationKind::DeployspecCompile).unwrap_err();
        assert!(err.to_string().starts_with("Deployspec compiler response"));
    }
}
