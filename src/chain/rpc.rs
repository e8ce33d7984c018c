//! SuiRpc: the read methods the client needs, and their response shapes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::core::error::TaisenResult;

/// One page of a cursor-paginated query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T, C = String> {
    pub data: Vec<T>,
    pub next_cursor: Option<C>,
    #[serde(default)]
    pub has_next_page: bool,
}

impl<T, C> Page<T, C> {
    pub fn last(data: Vec<T>) -> Self { Self { data, next_cursor: None, has_next_page: false } }

    /// Cursor for the following page, `None` when this page is the last.
    pub fn continuation(&self) -> Option<&C> {
        if self.has_next_page { self.next_cursor.as_ref() } else { None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCursor {
    pub tx_digest: String,
    pub event_seq: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiEvent {
    pub id: EventCursor,
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub parsed_json: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicFieldInfo {
    pub name: Value,
    pub object_id: String,
    #[serde(default)]
    pub object_type: String,
}

#[async_trait]
pub trait SuiRpc: Send + Sync {
    /// Object with content, owner and type. `None` when the object does not exist.
    async fn get_object(&self, id: &str) -> TaisenResult<Option<Value>>;

    async fn query_events(&self, event_type: &str, cursor: Option<EventCursor>, limit: usize) -> TaisenResult<Page<SuiEvent, EventCursor>>;

    async fn get_dynamic_fields(&self, parent: &str, cursor: Option<String>, limit: usize) -> TaisenResult<Page<DynamicFieldInfo>>;

    async fn get_owned_objects(&self, owner: &str, struct_type: &str, cursor: Option<String>) -> TaisenResult<Page<Value>>;
}

#[async_trait]
impl<T: SuiRpc + ?Sized> SuiRpc for Arc<T> {
    async fn get_object(&self, id: &str) -> TaisenResult<Option<Value>> { (**self).get_object(id).await }
    async fn query_events(&self, event_type: &str, cursor: Option<EventCursor>, limit: usize) -> TaisenResult<Page<SuiEvent, EventCursor>> {
        (**self).query_events(event_type, cursor, limit).await
    }
    async fn get_dynamic_fields(&self, parent: &str, cursor: Option<String>, limit: usize) -> TaisenResult<Page<DynamicFieldInfo>> {
        (**self).get_dynamic_fields(parent, cursor, limit).await
    }
    async fn get_owned_objects(&self, owner: &str, struct_type: &str, cursor: Option<String>) -> TaisenResult<Page<Value>> {
        (**self).get_owned_objects(owner, struct_type, cursor).await
    }
}

/// Walk `owner`'s objects until one of `struct_type` shows up. Used to
/// locate capabilities such as the platform admin cap.
pub async fn find_owned_object<R: SuiRpc + ?Sized>(rpc: &R, owner: &str, struct_type: &str) -> TaisenResult<Option<String>> {
    let mut cursor: Option<String> = None;
    loop {
        let page = rpc.get_owned_objects(owner, struct_type, cursor.clone()).await?;
        let found = page.data.iter().find_map(|obj| {
            let data = obj.get("data").unwrap_or(obj);
            if data.get("type").and_then(Value::as_str) == Some(struct_type) {
                data.get("objectId").and_then(Value::as_str).map(String::from)
            } else {
                None
            }
        });
        if found.is_some() {
            return Ok(found);
        }
        match page.continuation() {
            Some(next) => cursor = Some(next.clone()),
            None => return Ok(None),
        }
    }
}
