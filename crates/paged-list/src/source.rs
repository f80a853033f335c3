//! Seams between the controller, its remote source and its items

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::window::{PageRequest, PagedResult};

/// A remote, paged and filterable list
pub trait PageSource<T>: Send + Sync {
    fn fetch_page(
        &self,
        request: &PageRequest,
    ) -> impl Future<Output = crate::Result<PagedResult<T>>> + Send;
}

/// An item with a stable identity used to match pushed updates
pub trait ListItem {
    type Key: PartialEq + ?Sized;

    fn key(&self) -> &Self::Key;
}

/// A partial update merged over an existing item
pub trait ItemPatch<T> {
    fn apply(self, item: &mut T);
}

/// Shallow merge of a JSON object over any serde item.
///
/// Top-level keys in the patch replace the item's fields; nested objects are
/// replaced wholesale. If the merged value no longer deserializes as `T` the
/// item is left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonPatch(pub Map<String, Value>);

impl JsonPatch {
    /// Build from a JSON value; anything other than an object yields `None`
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Drop a key from the patch, e.g. the identity field of a push message
    pub fn without(mut self, key: &str) -> Self {
        self.0.remove(key);
        self
    }
}

impl<T> ItemPatch<T> for JsonPatch
where
    T: Serialize + DeserializeOwned,
{
    fn apply(self, item: &mut T) {
        let mut current = match serde_json::to_value(&*item) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                warn!("Patch target is not a JSON object");
                return;
            }
            Err(e) => {
                warn!(error = %e, "Failed to serialize patch target");
                return;
            }
        };

        for (key, value) in self.0 {
            current.insert(key, value);
        }

        match serde_json::from_value(Value::Object(current)) {
            Ok(merged) => *item = merged,
            Err(e) => warn!(error = %e, "Patched item no longer matches its type"),
        }
    }
}
