use taskplanner::core::todo::{Priority, Todo};
use taskplanner::message::Message;

pub const HELP: &str = "\
Commands:
  list                 show tasks (honours the active filter)
  cats                 show categories
  cat add <name>       add a category
  cat rm <name>        delete a category
  filter [<name>]      show one category, or all when no name is given
  title <text>         set the draft title
  desc <text>          set the draft description
  category <name>      set the draft category
  priority <level>     low, medium or high
  draft                show the draft
  save                 create the draft, or update the task being edited
  edit <n>             load task n into the draft
  cancel               discard the draft
  done <n> / undo <n>  mark task n completed or not
  toggle <n>           flip task n
  rm <n>               delete task n
  refresh              reload tasks from the server
  quit";

#[derive(Debug)]
pub enum Action {
    Dispatch(Message),
    List,
    Categories,
    Draft,
    Help,
    Quit,
    Nothing,
    Invalid(String),
}

/// Parse one input line. Row numbers refer to `visible`, 1-based.
pub fn parse(line: &str, visible: &[&Todo]) -> Action {
    let line = line.trim();
    let (cmd, rest) = match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    };

    match cmd {
        "" => Action::Nothing,
        "help" | "?" => Action::Help,
        "quit" | "exit" | "q" => Action::Quit,
        "list" | "ls" => Action::List,
        "cats" => Action::Categories,
        "draft" => Action::Draft,
        "refresh" => Action::Dispatch(Message::Refresh),
        "save" => Action::Dispatch(Message::Submit),
        "cancel" => Action::Dispatch(Message::CancelEdit),
        "filter" => Action::Dispatch(Message::SetFilter(rest.to_string())),
        "title" => Action::Dispatch(Message::SetDraftTitle(rest.to_string())),
        "desc" => Action::Dispatch(Message::SetDraftDescription(rest.to_string())),
        "category" => Action::Dispatch(Message::SetDraftCategory(rest.to_string())),
        "priority" => match Priority::from_name(rest) {
            Some(priority) => Action::Dispatch(Message::SetDraftPriority(priority)),
            None => Action::Invalid(format!("unknown priority '{}'", rest)),
        },
        "cat" => match rest.split_once(char::is_whitespace) {
            Some(("add", name)) => Action::Dispatch(Message::AddCategory(name.to_string())),
            Some(("rm", name)) => Action::Dispatch(Message::RemoveCategory(name.trim().to_string())),
            _ => Action::Invalid("usage: cat add <name> | cat rm <name>".into()),
        },
        "edit" | "done" | "undo" | "toggle" | "rm" => {
            let todo = match row(rest, visible) {
                Ok(todo) => todo,
                Err(e) => return Action::Invalid(e),
            };
            let Some(id) = todo.id.clone() else {
                return Action::Invalid("task has not been saved yet".into());
            };
            let message = match cmd {
                "edit" => Message::BeginEdit(id),
                "done" => Message::Toggle(id, true),
                "undo" => Message::Toggle(id, false),
                "toggle" => Message::Toggle(id, !todo.completed),
                _ => Message::Delete(id),
            };
            Action::Dispatch(message)
        }
        other => Action::Invalid(format!("unknown command '{}', try 'help'", other)),
    }
}

fn row<'a>(arg: &str, visible: &[&'a Todo]) -> Result<&'a Todo, String> {
    let n: usize = arg
        .parse()
        .map_err(|_| format!("expected a task number, got '{}'", arg))?;
    n.checked_sub(1)
        .and_then(|idx| visible.get(idx).copied())
        .ok_or_else(|| format!("no task {}", n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(id: &str, completed: bool) -> Todo {
        Todo {
            id: Some(id.into()),
            completed,
            ..Todo::new("t", "Work", Priority::Low)
        }
    }

    fn is(action: Action, f: impl Fn(&Message) -> bool) -> bool {
        matches!(action, Action::Dispatch(ref m) if f(m))
    }

    #[test]
    fn row_numbers_resolve_to_ids() {
        let a = todo("a", false);
        let b = todo("b", true);
        let visible = [&a, &b];

        assert!(is(parse("done 1", &visible), |m| matches!(m, Message::Toggle(id, true) if id == "a")));
        assert!(is(parse("toggle 2", &visible), |m| matches!(m, Message::Toggle(id, false) if id == "b")));
        assert!(is(parse("rm 2", &visible), |m| matches!(m, Message::Delete(id) if id == "b")));
        assert!(is(parse("edit 1", &visible), |m| matches!(m, Message::BeginEdit(id) if id == "a")));
    }

    #[test]
    fn bad_row_numbers_are_rejected() {
        let a = todo("a", false);
        assert!(matches!(parse("done 0", &[&a]), Action::Invalid(_)));
        assert!(matches!(parse("done 2", &[&a]), Action::Invalid(_)));
        assert!(matches!(parse("done x", &[&a]), Action::Invalid(_)));
    }

    #[test]
    fn draft_and_category_commands() {
        assert!(is(parse("title  Buy milk ", &[]), |m| matches!(m, Message::SetDraftTitle(t) if t == "Buy milk")));
        assert!(is(parse("priority HIGH", &[]), |m| matches!(m, Message::SetDraftPriority(Priority::High))));
        assert!(is(parse("cat add  Gym", &[]), |m| matches!(m, Message::AddCategory(n) if n.trim() == "Gym")));
        assert!(is(parse("cat rm Gym", &[]), |m| matches!(m, Message::RemoveCategory(n) if n == "Gym")));
        assert!(is(parse("filter", &[]), |m| matches!(m, Message::SetFilter(f) if f.is_empty())));
        assert!(matches!(parse("priority urgent", &[]), Action::Invalid(_)));
        assert!(matches!(parse("cat", &[]), Action::Invalid(_)));
    }

    #[test]
    fn simple_commands() {
        assert!(matches!(parse("", &[]), Action::Nothing));
        assert!(matches!(parse("ls", &[]), Action::List));
        assert!(matches!(parse("quit", &[]), Action::Quit));
        assert!(matches!(parse("frobnicate", &[]), Action::Invalid(_)));
    }
}
