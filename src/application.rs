use std::collections::HashMap;

use chrono::Utc;

use crate::command::Command;
use crate::config::ToggleRollback;
use crate::core::category::CategoryStore;
use crate::core::todo::{Todo, TodoStats};
use crate::message::{Message, Notice, ToggleOutcome};
use crate::storage::KeyValueStore;
use crate::sync::{ListResponse, TodoBackend};

/// Application state: categories, the todo collection, the draft under
/// edit and the active filter.
///
/// `update` never awaits. Remote calls are returned as a [`Command`] whose
/// futures resolve to follow-up messages.
pub struct Planner<B, S> {
    backend: B,
    categories: CategoryStore<S>,
    todos: Vec<Todo>,
    draft: Todo,
    editing_id: Option<String>,
    filter: String,
    notices: Vec<Notice>,
    toggle_rollback: ToggleRollback,
    /// Latest toggle sequence number issued per record.
    toggle_seq: HashMap<String, u64>,
}

impl<B: TodoBackend, S: KeyValueStore> Planner<B, S> {
    /// Load categories and start fetching the remote list.
    pub fn new(backend: B, store: S, toggle_rollback: ToggleRollback) -> (Self, Command<Message>) {
        let planner = Self {
            backend,
            categories: CategoryStore::initialize(store),
            todos: Vec::new(),
            draft: Todo::default(),
            editing_id: None,
            filter: String::new(),
            notices: Vec::new(),
            toggle_rollback,
            toggle_seq: HashMap::new(),
        };
        let command = planner.fetch_all();
        (planner, command)
    }

    pub fn categories(&self) -> &[String] {
        self.categories.names()
    }

    pub fn category_store(&self) -> &CategoryStore<S> {
        &self.categories
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn draft(&self) -> &Todo {
        &self.draft
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Records in `category`, or all records when it is empty.
    pub fn filter_by(&self, category: &str) -> Vec<&Todo> {
        self.todos
            .iter()
            .filter(|t| category.is_empty() || t.category == category)
            .collect()
    }

    pub fn visible_todos(&self) -> Vec<&Todo> {
        self.filter_by(&self.filter)
    }

    pub fn stats(&self) -> TodoStats {
        TodoStats::from_todos(&self.todos)
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::Refresh => return self.fetch_all(),

            Message::Loaded(result) => match result {
                Ok(ListResponse::RawList(todos)) | Ok(ListResponse::Wrapped { data: todos }) => {
                    log::info!("Loaded {} todos", todos.len());
                    self.todos = todos;
                }
                Ok(ListResponse::Unrecognized(value)) => {
                    log::error!("Invalid todo list format: {}", value);
                    self.todos.clear();
                }
                Err(e) => {
                    log::error!("Failed to fetch todos: {}", e);
                    self.notices.push(Notice::LoadFailed(e.to_string()));
                }
            },

            Message::AddCategory(name) => {
                if self.categories.add(&name) {
                    log::info!("Added category {}", name.trim());
                }
            }

            Message::RemoveCategory(name) => {
                if self.categories.remove(&name) {
                    log::info!("Removed category {}", name);
                }
                if self.draft.category == name {
                    self.draft.category.clear();
                }
                if self.filter == name {
                    self.filter.clear();
                }
            }

            Message::SetFilter(category) => {
                if category.is_empty() || self.categories.contains(&category) {
                    self.filter = category;
                } else {
                    log::warn!("Ignoring filter on unknown category {}", category);
                }
            }

            Message::SetDraftTitle(title) => self.draft.title = title,
            Message::SetDraftDescription(description) => self.draft.description = description,
            Message::SetDraftPriority(priority) => self.draft.priority = priority,

            Message::SetDraftCategory(category) => {
                if category.is_empty() || self.categories.contains(&category) {
                    self.draft.category = category;
                } else {
                    log::warn!("Ignoring unknown draft category {}", category);
                }
            }

            Message::BeginEdit(id) => match self.todos.iter().find(|t| t.has_id(&id)) {
                Some(todo) => {
                    self.draft = todo.clone();
                    self.editing_id = Some(id);
                }
                None => log::warn!("Cannot edit unknown todo {}", id),
            },

            Message::CancelEdit => self.reset_draft(),

            Message::Submit => return self.submit(),

            Message::Created(result) => match result {
                Ok(todo) => {
                    log::info!("Created todo {:?}", todo.id);
                    self.todos.push(todo);
                    self.reset_draft();
                }
                Err(e) => {
                    log::error!("Failed to create todo: {}", e);
                    self.notices.push(Notice::SaveFailed(e.to_string()));
                }
            },

            Message::Updated(id, result) => match result {
                Ok(todo) => {
                    match self.todos.iter_mut().find(|t| t.has_id(&id)) {
                        Some(slot) => *slot = todo,
                        None => log::debug!("Updated todo {} is no longer listed", id),
                    }
                    self.reset_draft();
                }
                Err(e) => {
                    log::error!("Failed to update todo {}: {}", id, e);
                    self.notices.push(Notice::SaveFailed(e.to_string()));
                }
            },

            Message::Delete(id) => {
                let backend = self.backend.clone();
                return Command::perform(
                    async move {
                        let result = backend.delete(&id).await;
                        (id, result)
                    },
                    |(id, result)| Message::Deleted(id, result),
                );
            }

            Message::Deleted(id, result) => match result {
                Ok(()) => {
                    log::info!("Deleted todo {}", id);
                    self.todos.retain(|t| !t.has_id(&id));
                    self.toggle_seq.remove(&id);
                }
                Err(e) => {
                    log::error!("Failed to delete todo {}: {}", id, e);
                    self.notices.push(Notice::DeleteFailed(e.to_string()));
                }
            },

            Message::Toggle(id, completed) => return self.toggle(id, completed),

            Message::ToggleSettled(outcome) => self.settle_toggle(outcome),
        }

        Command::none()
    }

    fn fetch_all(&self) -> Command<Message> {
        let backend = self.backend.clone();
        Command::perform(async move { backend.list().await }, Message::Loaded)
    }

    fn submit(&mut self) -> Command<Message> {
        if !self.draft.is_submittable() {
            self.notices.push(Notice::Validation);
            return Command::none();
        }

        let backend = self.backend.clone();
        match self.editing_id.clone() {
            Some(id) => {
                let payload = self.draft.clone();
                log::info!("Updating todo {}", id);
                Command::perform(
                    async move {
                        let result = backend.update(&id, &payload).await;
                        (id, result)
                    },
                    |(id, result)| Message::Updated(id, result),
                )
            }
            None => {
                let payload = self.draft.for_create(Utc::now());
                log::info!("Creating todo {:?}", payload.title);
                Command::perform(async move { backend.create(&payload).await }, Message::Created)
            }
        }
    }

    /// Flip the flag locally now, confirm it remotely later.
    fn toggle(&mut self, id: String, completed: bool) -> Command<Message> {
        let Some(todo) = self.todos.iter_mut().find(|t| t.has_id(&id)) else {
            log::warn!("Cannot toggle unknown todo {}", id);
            return Command::none();
        };
        let payload = Todo {
            completed,
            ..todo.clone()
        };
        todo.completed = completed;

        let seq = self.toggle_seq.entry(id.clone()).or_insert(0);
        *seq += 1;
        let seq = *seq;

        log::debug!("Toggled {} to {} (seq {})", id, completed, seq);
        let backend = self.backend.clone();
        Command::perform(
            async move {
                let result = backend.update(&id, &payload).await;
                ToggleOutcome {
                    id,
                    completed,
                    seq,
                    result,
                }
            },
            Message::ToggleSettled,
        )
    }

    fn settle_toggle(&mut self, outcome: ToggleOutcome) {
        let ToggleOutcome {
            id,
            completed,
            seq,
            result,
        } = outcome;

        let Err(e) = result else {
            log::debug!("Toggle of {} confirmed (seq {})", id, seq);
            return;
        };
        log::error!("Failed to update status of {}: {}", id, e);

        let superseded = self.toggle_rollback == ToggleRollback::LatestToggleWins
            && self.toggle_seq.get(&id).is_some_and(|&latest| latest != seq);
        if superseded {
            log::info!("Skipping rollback of {}, a newer toggle is pending", id);
        } else if let Some(todo) = self.todos.iter_mut().find(|t| t.has_id(&id)) {
            todo.completed = !completed;
        }
        self.notices.push(Notice::ToggleFailed);
    }

    fn reset_draft(&mut self) {
        self.draft = Todo::default();
        self.editing_id = None;
    }
}
