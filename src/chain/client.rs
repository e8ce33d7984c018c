//! JSON-RPC 2.0 client for a Sui fullnode.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::chain::network::Network;
use crate::chain::rpc::{DynamicFieldInfo, EventCursor, Page, SuiEvent, SuiRpc};
use crate::core::error::{TaisenError, TaisenResult};

pub struct JsonRpcClient {
    url: String,
    http: reqwest::Client,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), http: reqwest::Client::new(), next_id: AtomicU64::new(1) }
    }

    pub fn for_network(network: Network) -> Self { Self::new(network.fullnode_url()) }

    pub fn url(&self) -> &str { &self.url }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> TaisenResult<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params});
        tracing::debug!(method, id, "rpc call");

        let response: Value = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        decode(method, response)
    }
}

/// Unwrap a JSON-RPC envelope: `error` wins, otherwise `result` is decoded.
fn decode<T: DeserializeOwned>(method: &str, mut response: Value) -> TaisenResult<T> {
    if let Some(err) = response.get("error") {
        return Err(TaisenError::Rpc {
            code: err.get("code").and_then(Value::as_i64).unwrap_or(0),
            message: err.get("message").and_then(Value::as_str).unwrap_or("unknown").to_string(),
        });
    }
    let result = response
        .get_mut("result")
        .map(Value::take)
        .ok_or_else(|| TaisenError::Parse(format!("{}: response without result", method)))?;
    Ok(serde_json::from_value(result)?)
}

/// `sui_getObject` result, `None` when the object is missing or deleted.
fn object_or_none(id: &str, response: Value) -> Option<Value> {
    if response.get("data").map_or(true, Value::is_null) {
        let code = response.pointer("/error/code").and_then(Value::as_str).unwrap_or("missing");
        tracing::debug!(id, code, "object unavailable");
        return None;
    }
    Some(response)
}

#[async_trait]
impl SuiRpc for JsonRpcClient {
    async fn get_object(&self, id: &str) -> TaisenResult<Option<Value>> {
        let response: Value = self
            .call("sui_getObject", json!([id, {"showContent": true, "showOwner": true, "showType": true}]))
            .await?;
        Ok(object_or_none(id, response))
    }

    async fn query_events(&self, event_type: &str, cursor: Option<EventCursor>, limit: usize) -> TaisenResult<Page<SuiEvent, EventCursor>> {
        self.call("suix_queryEvents", json!([{"MoveEventType": event_type}, cursor, limit, false]))
            .await
    }

    async fn get_dynamic_fields(&self, parent: &str, cursor: Option<String>, limit: usize) -> TaisenResult<Page<DynamicFieldInfo>> {
        self.call("suix_getDynamicFields", json!([parent, cursor, limit])).await
    }

    async fn get_owned_objects(&self, owner: &str, struct_type: &str, cursor: Option<String>) -> TaisenResult<Page<Value>> {
        let query = json!({"filter": {"StructType": struct_type}, "options": {"showType": true}});
        self.call("suix_getOwnedObjects", json!([owner, query, cursor, null])).await
    }
}
