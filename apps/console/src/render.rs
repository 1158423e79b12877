//! Text rendering of a session snapshot.

use covert_core::option::{ConfigOption, OptionSet, RenderHint};
use covert_core::session::LogEntry;
use covert_core::transport::{SessionHandle, SessionSnapshot};

use std::fmt::Write;

use tokio::sync::Mutex;

/// Render the session state, the catalogs and the working configuration.
pub fn render_snapshot(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "Session {} ({})", snapshot.id, snapshot.state);
    let _ = writeln!(out, "Channels:   {}", list(&snapshot.channels));
    let _ = writeln!(out, "Processors: {}", list(&snapshot.processors));

    match snapshot.store.channel() {
        Some(channel) => {
            let _ = writeln!(out, "Channel '{}':", channel.type_name());
            render_options(&mut out, channel.properties());
        }
        None => {
            let _ = writeln!(out, "Channel: (none selected)");
        }
    }

    for (index, slot) in snapshot.store.processors().iter().enumerate() {
        match (slot.type_name(), slot.data()) {
            (Some(name), Some(data)) => {
                let _ = writeln!(out, "Processor #{index} '{name}':");
                render_options(&mut out, data);
            }
            _ => {
                let _ = writeln!(out, "Processor #{index}: (no type selected)");
            }
        }
    }

    if !snapshot.compose.is_empty() {
        let _ = writeln!(out, "Compose: {}", snapshot.compose);
    }

    out
}

pub fn render_option(key: &str, option: &ConfigOption) -> String {
    let name = match option.display_name() {
        "" => key,
        name => name,
    };
    let mut line = format!("{key} ({name}) = {} [{}]", option.render(), option.type_tag());

    match option.render_hint() {
        RenderHint::Choice => {
            let choices = option.range().unwrap_or_default().join(", ");
            let _ = write!(line, " one of: {choices}");
        }
        RenderHint::Unsupported => line.push_str(" read-only"),
        _ => {}
    }
    line
}

fn render_options(out: &mut String, options: &OptionSet) {
    if options.is_empty() {
        let _ = writeln!(out, "  (no options)");
    }
    for (key, option) in options {
        let _ = writeln!(out, "  {}", render_option(key, option));
    }
}

fn list(names: &[String]) -> String {
    if names.is_empty() {
        "(none)".to_string()
    } else {
        names.join(", ")
    }
}

/// Tracks which log entries have been shown, so the input loop and the event
/// task never print the same line twice.
#[derive(Default)]
pub struct LogCursor {
    seen: Mutex<usize>,
}

impl LogCursor {
    /// Return the log entries not yet printed and mark them printed.
    pub async fn take_new(&self, handle: &SessionHandle) -> Vec<LogEntry> {
        let snapshot = handle.snapshot().await;
        let mut seen = self.seen.lock().await;
        let fresh = snapshot
            .log
            .get(*seen..)
            .unwrap_or_default()
            .to_vec();
        *seen = snapshot.log.len().max(*seen);
        fresh
    }
}
