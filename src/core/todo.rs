use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Case-insensitive; also accepts the first letter.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" | "l" => Some(Self::Low),
            "medium" | "m" => Some(Self::Medium),
            "high" | "h" => Some(Self::High),
            _ => None,
        }
    }
}

/// A todo record as exchanged with the remote service.
///
/// The same type doubles as the editing draft: a draft for a new record has
/// no `id` and no `created_at`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: Priority,
    #[serde(default, deserialize_with = "null_as_default")]
    pub completed: bool,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Todo {
    pub fn new(title: impl Into<String>, category: impl Into<String>, priority: Priority) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            priority,
            ..Self::default()
        }
    }

    /// Title and category are the only required fields.
    pub fn is_submittable(&self) -> bool {
        !self.title.is_empty() && !self.category.is_empty()
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }

    /// Payload for a create request: never completed, stamped now.
    pub fn for_create(&self, now: DateTime<Utc>) -> Self {
        Self {
            completed: false,
            created_at: Some(timestamp(now)),
            ..self.clone()
        }
    }

    /// Creation time rendered in the local timezone, if it parses.
    pub fn created_local(&self) -> Option<String> {
        let raw = self.created_at.as_deref()?;
        let parsed = DateTime::parse_from_rfc3339(raw).ok()?;
        Some(
            parsed
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
        )
    }
}

/// Explicit `null` decodes like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// ISO-8601 UTC with millisecond precision, e.g. `2026-10-19T08:30:00.000Z`.
pub fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Completion counts over a collection of todos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodoStats {
    pub total: usize,
    pub completed: usize,
    pub remaining: usize,
}

impl TodoStats {
    pub fn from_todos<'a>(todos: impl IntoIterator<Item = &'a Todo>) -> Self {
        let mut stats = Self::default();
        for todo in todos {
            stats.total += 1;
            if todo.completed {
                stats.completed += 1;
            }
        }
        stats.remaining = stats.total - stats.completed;
        stats
    }
}
