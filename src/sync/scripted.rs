//! In-process backend for tests: records every call and answers from
//! queued results, echoing the request when nothing is queued.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::{ApiError, ListResponse, TodoBackend};
use crate::core::todo::Todo;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    List,
    Create(Todo),
    Update(String, Todo),
    Delete(String),
}

#[derive(Default)]
struct Script {
    list: VecDeque<Result<ListResponse, ApiError>>,
    create: VecDeque<Result<Todo, ApiError>>,
    update: VecDeque<Result<Todo, ApiError>>,
    delete: VecDeque<Result<(), ApiError>>,
    calls: Vec<Call>,
    next_id: u32,
}

#[derive(Clone, Default)]
pub(crate) struct ScriptedBackend {
    script: Arc<Mutex<Script>>,
}

pub(crate) fn unavailable() -> ApiError {
    ApiError::Status {
        status: 503,
        body: "unavailable".into(),
    }
}

impl ScriptedBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_list(&self, result: Result<ListResponse, ApiError>) {
        self.script.lock().unwrap().list.push_back(result);
    }

    pub(crate) fn push_create(&self, result: Result<Todo, ApiError>) {
        self.script.lock().unwrap().create.push_back(result);
    }

    pub(crate) fn push_update(&self, result: Result<Todo, ApiError>) {
        self.script.lock().unwrap().update.push_back(result);
    }

    pub(crate) fn push_delete(&self, result: Result<(), ApiError>) {
        self.script.lock().unwrap().delete.push_back(result);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.script.lock().unwrap().calls.clone()
    }
}

impl TodoBackend for ScriptedBackend {
    async fn list(&self) -> Result<ListResponse, ApiError> {
        let mut script = self.script.lock().unwrap();
        script.calls.push(Call::List);
        script
            .list
            .pop_front()
            .unwrap_or_else(|| Ok(ListResponse::RawList(Vec::new())))
    }

    async fn create(&self, todo: &Todo) -> Result<Todo, ApiError> {
        let mut script = self.script.lock().unwrap();
        script.calls.push(Call::Create(todo.clone()));
        if let Some(result) = script.create.pop_front() {
            return result;
        }
        script.next_id += 1;
        Ok(Todo {
            id: Some(format!("srv-{}", script.next_id)),
            ..todo.clone()
        })
    }

    async fn update(&self, id: &str, todo: &Todo) -> Result<Todo, ApiError> {
        let mut script = self.script.lock().unwrap();
        script.calls.push(Call::Update(id.to_string(), todo.clone()));
        script.update.pop_front().unwrap_or_else(|| {
            Ok(Todo {
                id: Some(id.to_string()),
                ..todo.clone()
            })
        })
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let mut script = self.script.lock().unwrap();
        script.calls.push(Call::Delete(id.to_string()));
        script.delete.pop_front().unwrap_or(Ok(()))
    }
}
