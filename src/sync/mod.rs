pub mod http;

#[cfg(test)]
pub(crate) mod scripted;

use std::future::Future;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::core::todo::Todo;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid base URL {0}")]
    InvalidUrl(String),
}

/// Shape of a list response. The service answers either with a bare array
/// or with the array wrapped in `{"data": [...]}`.
///
/// The shape is decided before the elements are decoded; an element that is
/// not a todo is logged and skipped without affecting the rest.
#[derive(Debug, Clone, PartialEq)]
pub enum ListResponse {
    RawList(Vec<Todo>),
    Wrapped { data: Vec<Todo> },
    Unrecognized(Value),
}

impl<'de> Deserialize<'de> for ListResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

fn decode_items(items: Vec<Value>) -> Vec<Todo> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Todo>(item) {
            Ok(todo) => Some(todo),
            Err(e) => {
                log::warn!("Skipping undecodable todo: {}", e);
                None
            }
        })
        .collect()
}

impl ListResponse {
    fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::RawList(decode_items(items)),
            Value::Object(mut map) => match map.remove("data") {
                Some(Value::Array(items)) => Self::Wrapped {
                    data: decode_items(items),
                },
                Some(other) => {
                    map.insert("data".to_string(), other);
                    Self::Unrecognized(Value::Object(map))
                }
                None => Self::Unrecognized(Value::Object(map)),
            },
            other => Self::Unrecognized(other),
        }
    }

    pub fn into_todos(self) -> Option<Vec<Todo>> {
        match self {
            Self::RawList(todos) | Self::Wrapped { data: todos } => Some(todos),
            Self::Unrecognized(_) => None,
        }
    }
}

/// Remote persistence for todo records.
///
/// Implementations are cheap to clone; each call is a single attempt with
/// no retry.
pub trait TodoBackend: Clone + Send + Sync + 'static {
    fn list(&self) -> impl Future<Output = Result<ListResponse, ApiError>> + Send;

    fn create(&self, todo: &Todo) -> impl Future<Output = Result<Todo, ApiError>> + Send;

    fn update(&self, id: &str, todo: &Todo) -> impl Future<Output = Result<Todo, ApiError>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = Result<(), ApiError>> + Send;
}
