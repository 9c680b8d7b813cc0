//! Cursor-paginated listing pages.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A fully materialized collection, shaped as `{ "data": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Listing<T> {
    pub data: Vec<T>,
}

impl<T> Listing<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// One page of a cursor-paginated collection.
///
/// Pages are transient: they exist only while a listing is being drained.
/// Every field is read leniently so that a sparse response still yields a
/// well-formed page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    /// Items carried by this page, in server order.
    pub data: Vec<Value>,
    /// Whether the server reports further pages.
    pub has_more: bool,
    /// Absolute URL of the following page, when one was supplied.
    pub next: Option<String>,
}

impl Page {
    /// Build a page from a decoded listing response.
    ///
    /// - `data` defaults to an empty sequence when absent or not an array.
    /// - `has_more` defaults to `false` when absent or not a boolean.
    /// - `next` is `None` when absent, `null`, blank, or not a string.
    ///
    /// A bare top-level array is treated as a single, final page.
    pub fn from_document(document: Value) -> Self {
        match document {
            Value::Array(items) => Self {
                data: items,
                has_more: false,
                next: None,
            },
            Value::Object(mut map) => {
                let data = match map.remove("data") {
                    Some(Value::Array(items)) => items,
                    _ => Vec::new(),
                };
                let has_more = map.get("has_more").and_then(Value::as_bool).unwrap_or(false);
                let next = match map.remove("next") {
                    Some(Value::String(url)) if !url.trim().is_empty() => Some(url),
                    _ => None,
                };
                Self { data, has_more, next }
            }
            _ => Self::default(),
        }
    }

    /// Returns the URL to fetch after this page, if pagination should continue.
    ///
    /// `has_more == true` without a `next` URL is terminal.
    pub fn continuation(&self) -> Option<&str> {
        if self.has_more { self.next.as_deref() } else { None }
    }
}
