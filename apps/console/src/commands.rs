//! Operator command line parsing.
//!
//! One command per line. Values are everything after the key, so option
//! values and messages may contain spaces.

use crate::error::ConsoleError;

use covert_core::transport::OperatorAction;

use common::ErrorLocation;

use std::panic::Location;

pub const HELP: &str = "\
Commands:
  show                          print the session and current configuration
  schema                        request the schema again
  channel <type>                select a channel type
  set <key> <value>             set a channel option
  processor add                 append an empty processor slot
  processor <index> <type>      choose the processor type for a slot
  processor remove <index>      remove a processor slot
  pset <index> <key> <value>    set a processor option
  open                          open the covert channel
  close                         close the covert channel
  write <text>                  send a covert message
  compose <text>                put text in the compose buffer
  send                          send the compose buffer
  abandon                       stop waiting for an open/close acknowledgement
  help                          show this text
  quit                          disconnect and exit";

/// A parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Action(OperatorAction),
    Show,
    Help,
    Quit,
}

/// Parse one line of operator input. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>, ConsoleError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = split_word(line);

    let command = match verb {
        "show" => ConsoleCommand::Show,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        "schema" => ConsoleCommand::Action(OperatorAction::RequestSchema),
        "open" => ConsoleCommand::Action(OperatorAction::Open),
        "close" => ConsoleCommand::Action(OperatorAction::Close),
        "send" => ConsoleCommand::Action(OperatorAction::SendComposed),
        "abandon" => ConsoleCommand::Action(OperatorAction::AbandonPending),
        "channel" => ConsoleCommand::Action(OperatorAction::SelectChannel {
            name: required(rest, "channel <type>")?.to_string(),
        }),
        "set" => {
            let (key, value) = split_word(rest);
            ConsoleCommand::Action(OperatorAction::SetChannelOption {
                key: required(key, "set <key> <value>")?.to_string(),
                input: value.to_string(),
            })
        }
        "processor" => parse_processor(rest)?,
        "pset" => {
            let (index, rest) = split_word(rest);
            let (key, value) = split_word(rest);
            ConsoleCommand::Action(OperatorAction::SetProcessorOption {
                index: parse_index(index)?,
                key: required(key, "pset <index> <key> <value>")?.to_string(),
                input: value.to_string(),
            })
        }
        "write" => ConsoleCommand::Action(OperatorAction::Send {
            text: rest.to_string(),
        }),
        "compose" => ConsoleCommand::Action(OperatorAction::Compose {
            text: rest.to_string(),
        }),
        other => {
            return Err(ConsoleError::Command {
                message: format!("Unknown command '{other}' (try 'help')"),
                location: ErrorLocation::from(Location::caller()),
            });
        }
    };

    Ok(Some(command))
}

fn parse_processor(rest: &str) -> Result<ConsoleCommand, ConsoleError> {
    let (first, rest) = split_word(rest);
    let action = match first {
        "add" => OperatorAction::AddProcessor,
        "remove" => OperatorAction::RemoveProcessor {
            index: parse_index(rest)?,
        },
        index => OperatorAction::SelectProcessor {
            index: parse_index(index)?,
            name: required(rest, "processor <index> <type>")?.to_string(),
        },
    };
    Ok(ConsoleCommand::Action(action))
}

/// Split off the first whitespace-delimited word.
fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (text, ""),
    }
}

#[track_caller]
fn required<'a>(value: &'a str, usage: &str) -> Result<&'a str, ConsoleError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ConsoleError::Command {
            message: format!("Usage: {usage}"),
            location: ErrorLocation::from(Location::caller()),
        })
    } else {
        Ok(value)
    }
}

#[track_caller]
fn parse_index(text: &str) -> Result<usize, ConsoleError> {
    text.trim().parse().map_err(|_| ConsoleError::Command {
        message: format!("'{text}' is not a processor index"),
        location: ErrorLocation::from(Location::caller()),
    })
}
