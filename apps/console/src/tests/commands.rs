// Unit tests for console command parsing

use crate::commands::{ConsoleCommand, parse_command};
use crate::error::ConsoleError;

use covert_core::transport::OperatorAction;

fn action(line: &str) -> OperatorAction {
    match parse_command(line) {
        Ok(Some(ConsoleCommand::Action(action))) => action,
        other => panic!("'{line}' should parse to an action, got {other:?}"),
    }
}

/// **VALUE**: Verifies option values keep their inner spaces.
///
/// **WHY THIS MATTERS**: Select choices and covert messages can contain spaces; splitting
/// on every space would truncate them.
#[test]
fn given_set_with_spaced_value_when_parsed_then_value_kept_whole() {
    assert_eq!(
        action("set mode  slow start "),
        OperatorAction::SetChannelOption {
            key: "mode".to_string(),
            input: "slow start".to_string(),
        }
    );
    assert_eq!(
        action("write hello there"),
        OperatorAction::Send {
            text: "hello there".to_string()
        }
    );
}

/// **VALUE**: Verifies the processor sub-commands map to the right actions.
#[test]
fn given_processor_commands_when_parsed_then_slot_actions() {
    assert_eq!(action("processor add"), OperatorAction::AddProcessor);
    assert_eq!(
        action("processor 1 Caesar"),
        OperatorAction::SelectProcessor {
            index: 1,
            name: "Caesar".to_string()
        }
    );
    assert_eq!(
        action("processor remove 0"),
        OperatorAction::RemoveProcessor { index: 0 }
    );
    assert_eq!(
        action("pset 2 shift -3"),
        OperatorAction::SetProcessorOption {
            index: 2,
            key: "shift".to_string(),
            input: "-3".to_string()
        }
    );
}

/// **VALUE**: Verifies the bare lifecycle verbs.
#[test]
fn given_lifecycle_verbs_when_parsed_then_actions() {
    assert_eq!(action("schema"), OperatorAction::RequestSchema);
    assert_eq!(action("open"), OperatorAction::Open);
    assert_eq!(action("close"), OperatorAction::Close);
    assert_eq!(action("send"), OperatorAction::SendComposed);
    assert_eq!(action("abandon"), OperatorAction::AbandonPending);
    assert_eq!(
        action("channel tcp"),
        OperatorAction::SelectChannel {
            name: "tcp".to_string()
        }
    );
}

/// **VALUE**: Verifies console-only commands and blank input.
#[test]
fn given_console_commands_when_parsed_then_not_actions() {
    assert_eq!(parse_command("  ").expect("blank is fine"), None);
    assert_eq!(parse_command("show").expect("valid"), Some(ConsoleCommand::Show));
    assert_eq!(parse_command("help").expect("valid"), Some(ConsoleCommand::Help));
    assert_eq!(parse_command("exit").expect("valid"), Some(ConsoleCommand::Quit));
}

/// **VALUE**: Verifies bad input is a command error with usage text.
///
/// **BUG THIS CATCHES**: Would catch a missing argument being sent as an empty name,
/// which the service would only reject after a round trip.
#[test]
fn given_malformed_lines_when_parsed_then_command_error() {
    for line in ["channel", "processor x Caesar", "processor 0", "pset 0", "teleport now"] {
        assert!(
            matches!(parse_command(line), Err(ConsoleError::Command { .. })),
            "'{line}' should be rejected"
        );
    }
}
