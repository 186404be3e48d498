use std::fmt::Write;

use taskplanner::core::todo::{Todo, TodoStats};

pub fn task_list(todos: &[&Todo], stats: TodoStats, filter: &str) -> String {
    let mut out = format!(
        "Tasks: {} total, {} completed, {} remaining\n",
        stats.total, stats.completed, stats.remaining
    );
    if !filter.is_empty() {
        let _ = writeln!(out, "Showing category: {}", filter);
    }

    if todos.is_empty() {
        out.push_str("  No tasks found\n");
        return out;
    }

    for (i, todo) in todos.iter().enumerate() {
        let mark = if todo.completed { 'x' } else { ' ' };
        let created = todo.created_local().unwrap_or_else(|| "Unknown".into());
        let _ = writeln!(
            out,
            "{:>3}. [{}] {}  ({}, {})  {}",
            i + 1,
            mark,
            todo.title,
            todo.category,
            todo.priority.as_str(),
            created
        );
        if !todo.description.is_empty() {
            let _ = writeln!(out, "       {}", todo.description);
        }
    }
    out
}

pub fn categories(names: &[String], filter: &str) -> String {
    if names.is_empty() {
        return "No categories\n".into();
    }
    let mut out = String::new();
    for name in names {
        let marker = if name == filter { '*' } else { ' ' };
        let _ = writeln!(out, " {} {}", marker, name);
    }
    out
}

pub fn draft(draft: &Todo, editing_id: Option<&str>) -> String {
    let heading = match editing_id {
        Some(id) => format!("Editing task {}", id),
        None => "New task".to_string(),
    };
    let or_unset = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };
    format!(
        "{}\n  title:       {}\n  description: {}\n  category:    {}\n  priority:    {}\n",
        heading,
        or_unset(&draft.title),
        or_unset(&draft.description),
        or_unset(&draft.category),
        draft.priority.as_str()
    )
}
