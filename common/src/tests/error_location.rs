use crate::ErrorLocation;
use std::panic::Location;

#[track_caller]
fn raise() -> ErrorLocation {
    ErrorLocation::caller()
}

/// **VALUE**: Verifies that `ErrorLocation::from()` captures file, line, and column.
///
/// **WHY THIS MATTERS**: Every error in the client embeds an ErrorLocation. If it captures
/// the wrong position, status lines and logs point operators at the wrong code.
///
/// **BUG THIS CATCHES**: Would catch if file path or line/column extraction breaks.
#[test]
fn given_location_caller_when_error_location_created_then_captures_file_line_column() {
    // GIVEN: Current caller location
    // WHEN: Creating ErrorLocation from caller
    let location = ErrorLocation::from(Location::caller());

    // THEN: Should capture file, line, and column
    assert!(
        location.file.contains("error_location.rs"),
        "Should capture file path"
    );
    assert!(location.line > 0, "Should capture line number");
    assert!(location.column > 0, "Should capture column number");
}

/// **VALUE**: Verifies that `ErrorLocation::caller()` reports the call site, not itself.
///
/// **WHY THIS MATTERS**: Error constructors are `#[track_caller]`; the location must be the
/// code that raised the error rather than the helper that built it.
///
/// **BUG THIS CATCHES**: Would catch if `#[track_caller]` is dropped from `caller()`, which
/// would make every error point at `common/src/error/error_location.rs`.
#[test]
fn given_track_caller_helper_when_caller_invoked_then_points_at_call_site() {
    // GIVEN: The line we are about to call from
    let expected_line = line!() + 3;

    // WHEN: Raising through a #[track_caller] helper
    let location = raise();

    // THEN: The location is this test's call site
    assert_eq!(location.line, expected_line);
    assert!(location.file.contains("tests"));
}

/// **VALUE**: Verifies that Display produces the bracketed `[file:line:column]` format.
///
/// **WHY THIS MATTERS**: Error messages are shown to operators in the session log; a broken
/// format makes them unreadable.
///
/// **BUG THIS CATCHES**: Would catch if brackets or separators change.
#[test]
fn given_error_location_when_formatted_then_produces_bracketed_format() {
    // GIVEN: An ErrorLocation
    let location = ErrorLocation {
        file: "src/session/router.rs",
        line: 42,
        column: 7,
    };

    // WHEN: Formatting as string
    let formatted = location.to_string();

    // THEN: Should produce "[file:line:column]"
    assert_eq!(formatted, "[src/session/router.rs:42:7]");
}
