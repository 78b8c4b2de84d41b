//! HttpInvoker - endpoint URL に JSON payload を POST する RemoteInvoker
//!
//! - 1 回の invoke で 1 回だけ request を送る（retry なし）
//! - timeout は reqwest client に設定
//! - 接続失敗 / timeout / 非 2xx / JSON でない body は全部 Transport エラー

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::errors::InvokerError;
use crate::ports::RemoteInvoker;

#[derive(Debug, Clone)]
pub struct HttpInvoker {
    client: reqwest::Client,
}

impl HttpInvoker {
    pub fn new(timeout: Duration) -> Result<Self, InvokerError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InvokerError::Configuration(format!("http client: {e}")))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RemoteInvoker for HttpInvoker {
    async fn invoke(&self, address: &str, payload: Value) -> Result<Value, InvokerError> {
        let response = self
            .client
            .post(address)
            .json(&payload)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| InvokerError::transport(address, e))?;

        response
            .json::<Value>()
            .await
            .map_err(|e| InvokerError::transport(address, e))
    }
}
