//! Task board commands.

use std::str::FromStr;
use taskpad_core::TodoList;
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  add <text>      add a task
  toggle <n>      mark task n done / not done (alias: done)
  rm <n>          delete task n (alias: delete)
  clear           remove completed tasks
  list            show the board (alias: ls)
  ask <message>   send a message to the chat assistant
  help            show this help
  quit            leave (alias: exit)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskCommand {
    Add(String),
    /// 1-based position as displayed by `list`
    Toggle(usize),
    Delete(usize),
    ClearCompleted,
    List,
    Ask(String),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type 'help' for a list of commands.")]
    Unknown(String),

    #[error("'{0}' needs a task number")]
    MissingPosition(String),

    #[error("'{0}' is not a task number")]
    InvalidPosition(String),

    #[error("No task at position {0}")]
    NoSuchTask(usize),
}

impl FromStr for TaskCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            // Blank text is left for the list to ignore.
            "add" => TaskCommand::Add(rest.to_string()),
            "toggle" | "done" => TaskCommand::Toggle(parse_position(verb, rest)?),
            "rm" | "delete" => TaskCommand::Delete(parse_position(verb, rest)?),
            "clear" => TaskCommand::ClearCompleted,
            "list" | "ls" => TaskCommand::List,
            "ask" => TaskCommand::Ask(rest.to_string()),
            "help" | "?" => TaskCommand::Help,
            "quit" | "exit" | "q" => TaskCommand::Quit,
            _ => return Err(CommandError::Unknown(verb.to_string())),
        };
        Ok(command)
    }
}

fn parse_position(verb: &str, rest: &str) -> Result<usize, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingPosition(verb.to_string()));
    }
    match rest.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::InvalidPosition(rest.to_string())),
    }
}

/// What the front-end should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Show the rendered board.
    Board(String),
    Message(String),
    /// Hand the message to the chat widget.
    Ask(String),
    Quit,
}

/// Apply a parsed command to the list.
pub fn apply(list: &mut TodoList, command: TaskCommand) -> Result<Outcome, CommandError> {
    let outcome = match command {
        TaskCommand::Add(text) => match list.add(text) {
            Some(_) => Outcome::Board(list.render()),
            None => Outcome::Message("Nothing to add".to_string()),
        },
        TaskCommand::Toggle(position) => {
            let id = id_at(list, position)?;
            list.toggle(id);
            Outcome::Board(list.render())
        }
        TaskCommand::Delete(position) => {
            let id = id_at(list, position)?;
            list.delete(id);
            Outcome::Board(list.render())
        }
        TaskCommand::ClearCompleted => {
            if !list.has_completed() {
                return Ok(Outcome::Message("No completed tasks".to_string()));
            }
            list.clear_completed();
            Outcome::Board(list.render())
        }
        TaskCommand::List => Outcome::Board(list.render()),
        TaskCommand::Ask(message) => Outcome::Ask(message),
        TaskCommand::Help => Outcome::Message(HELP.to_string()),
        TaskCommand::Quit => Outcome::Quit,
    };
    Ok(outcome)
}

fn id_at(list: &TodoList, position: usize) -> Result<i64, CommandError> {
    position
        .checked_sub(1)
        .and_then(|index| list.items().get(index))
        .map(|item| item.id)
        .ok_or(CommandError::NoSuchTask(position))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(list: &mut TodoList, line: &str) -> Result<Outcome, CommandError> {
        apply(list, line.parse()?)
    }

    #[test]
    fn parses_commands_and_aliases() {
        assert_eq!(
            "add Buy milk".parse::<TaskCommand>(),
            Ok(TaskCommand::Add("Buy milk".to_string()))
        );
        assert_eq!("done 2".parse::<TaskCommand>(), Ok(TaskCommand::Toggle(2)));
        assert_eq!("RM 1".parse::<TaskCommand>(), Ok(TaskCommand::Delete(1)));
        assert_eq!("ls".parse::<TaskCommand>(), Ok(TaskCommand::List));
        assert_eq!("clear".parse::<TaskCommand>(), Ok(TaskCommand::ClearCompleted));
        assert_eq!(
            "ask what next?".parse::<TaskCommand>(),
            Ok(TaskCommand::Ask("what next?".to_string()))
        );
        assert_eq!("exit".parse::<TaskCommand>(), Ok(TaskCommand::Quit));
    }

    #[test]
    fn rejects_bad_positions() {
        assert_eq!(
            "toggle".parse::<TaskCommand>(),
            Err(CommandError::MissingPosition("toggle".to_string()))
        );
        assert_eq!(
            "rm zero".parse::<TaskCommand>(),
            Err(CommandError::InvalidPosition("zero".to_string()))
        );
        assert_eq!(
            "rm 0".parse::<TaskCommand>(),
            Err(CommandError::InvalidPosition("0".to_string()))
        );
        assert!(matches!(
            "frobnicate".parse::<TaskCommand>(),
            Err(CommandError::Unknown(_))
        ));
    }

    #[test]
    fn board_session_follows_positions() {
        let mut list = TodoList::new();
        run(&mut list, "add Buy milk").unwrap();
        run(&mut list, "add Walk dog").unwrap();
        run(&mut list, "done 1").unwrap();

        assert!(list.items()[0].completed);
        assert_eq!(list.remaining_count(), 1);

        let outcome = run(&mut list, "clear").unwrap();
        match outcome {
            Outcome::Board(board) => {
                assert!(board.contains("Walk dog"));
                assert!(!board.contains("Buy milk"));
                assert!(board.contains("1 task remaining"));
            }
            other => panic!("expected board, got {other:?}"),
        }

        assert_eq!(run(&mut list, "rm 5"), Err(CommandError::NoSuchTask(5)));
    }

    #[test]
    fn blank_add_and_empty_clear_are_reported() {
        let mut list = TodoList::new();
        assert_eq!(
            run(&mut list, "add    "),
            Ok(Outcome::Message("Nothing to add".to_string()))
        );
        assert_eq!(
            run(&mut list, "clear"),
            Ok(Outcome::Message("No completed tasks".to_string()))
        );
        assert!(list.is_empty());
    }

    #[test]
    fn ask_is_handed_to_the_widget() {
        let mut list = TodoList::new();
        assert_eq!(
            run(&mut list, "ask hello there"),
            Ok(Outcome::Ask("hello there".to_string()))
        );
    }
}
