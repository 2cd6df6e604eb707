//! Line-oriented command scripts driving an `ItineraryApp`.
//!
//! One command per line; blank lines and `#` comments are skipped. A slot
//! is an event id or `new` for the create form.

use std::io::{BufRead, Write};

use anyhow::Context;
use chrono::{DateTime, Utc};
use client_core::{EditorSlot, FormInput, ItineraryApp, Key, RowInput, UserInput};
use shared::{
    domain::{EventId, EventType, FilterType, OfferId, SortType},
    error::ParseEnumError,
};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Input(UserInput),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("invalid {argument} '{value}'")]
    InvalidArgument {
        argument: &'static str,
        value: String,
    },
    #[error(transparent)]
    UnknownName(#[from] ParseEnumError),
}

/// Parses one script line. `Ok(None)` for blank lines and comments.
pub fn parse_command(line: &str) -> Result<Option<Command>, ScriptError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let command = match name {
        "show" => Command::Show,
        "new" => Command::Input(UserInput::NewEventClick),
        "esc" => Command::Input(UserInput::KeyDown(Key::Escape)),
        "open" => row_command(rest, "open", RowInput::RollupClick)?,
        "fav" => row_command(rest, "fav", RowInput::FavoriteClick)?,
        "filter" => {
            let value = required(rest, "filter", "a filter name")?;
            Command::Input(UserInput::Filter(value.parse::<FilterType>()?))
        }
        "sort" => {
            let value = required(rest, "sort", "a sort name")?;
            Command::Input(UserInput::Sort(value.parse::<SortType>()?))
        }
        "type" => form_command(rest, "type", |value| {
            Ok(FormInput::EventType(value.parse::<EventType>()?))
        })?,
        "dest" => form_command(rest, "dest", |value| Ok(FormInput::Destination(value.to_string())))?,
        "price" => form_command(rest, "price", |value| Ok(FormInput::Price(value.to_string())))?,
        "offer" => form_command(rest, "offer", |value| {
            let id = value
                .parse::<i64>()
                .map_err(|_| invalid("offer id", value))?;
            Ok(FormInput::ToggleOffer(OfferId(id)))
        })?,
        "from" => form_command(rest, "from", |value| Ok(FormInput::DateFrom(timestamp(value)?)))?,
        "to" => form_command(rest, "to", |value| Ok(FormInput::DateTo(timestamp(value)?)))?,
        "save" => slot_command(rest, "save", FormInput::Submit)?,
        "close" => slot_command(rest, "close", FormInput::Rollup)?,
        "reset" => slot_command(rest, "reset", FormInput::Reset)?,
        other => return Err(ScriptError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

fn required<'a>(
    rest: &'a str,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, ScriptError> {
    if rest.is_empty() {
        return Err(ScriptError::MissingArgument { command, argument });
    }
    Ok(rest)
}

fn invalid(argument: &'static str, value: &str) -> ScriptError {
    ScriptError::InvalidArgument {
        argument,
        value: value.to_string(),
    }
}

fn event_id(value: &str) -> Result<EventId, ScriptError> {
    value
        .parse::<i64>()
        .map(EventId)
        .map_err(|_| invalid("event id", value))
}

fn slot(value: &str) -> Result<EditorSlot, ScriptError> {
    if value.eq_ignore_ascii_case("new") {
        return Ok(EditorSlot::Create);
    }
    event_id(value).map(EditorSlot::Event)
}

fn timestamp(value: &str) -> Result<DateTime<Utc>, ScriptError> {
    DateTime::parse_from_rfc3339(value)
        .map(|date| date.with_timezone(&Utc))
        .map_err(|_| invalid("timestamp", value))
}

fn row_command(rest: &str, command: &'static str, input: RowInput) -> Result<Command, ScriptError> {
    let id = event_id(required(rest, command, "an event id")?)?;
    Ok(Command::Input(UserInput::Row { id, input }))
}

fn slot_command(rest: &str, command: &'static str, input: FormInput) -> Result<Command, ScriptError> {
    let slot = slot(required(rest, command, "a slot")?)?;
    Ok(Command::Input(UserInput::Form { slot, input }))
}

fn form_command(
    rest: &str,
    command: &'static str,
    value: impl FnOnce(&str) -> Result<FormInput, ScriptError>,
) -> Result<Command, ScriptError> {
    let rest = required(rest, command, "a slot")?;
    let (raw_slot, raw_value) = match rest.split_once(char::is_whitespace) {
        Some((raw_slot, raw_value)) => (raw_slot, raw_value.trim()),
        None => (rest, ""),
    };
    let slot = slot(raw_slot)?;
    let input = value(raw_value)?;
    Ok(Command::Input(UserInput::Form { slot, input }))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    pub executed: usize,
    pub failed: usize,
}

/// Runs every line of `script` against `app`. Failing lines are reported to
/// `out` and the script carries on.
pub fn run_script(
    app: &mut ItineraryApp,
    script: impl BufRead,
    out: &mut impl Write,
) -> anyhow::Result<ScriptSummary> {
    let mut summary = ScriptSummary::default();
    for (index, line) in script.lines().enumerate() {
        let line = line.context("failed to read script line")?;
        let number = index + 1;
        let outcome = match parse_command(&line) {
            Ok(None) => continue,
            Ok(Some(Command::Show)) => {
                write!(out, "{}", app.render_text())?;
                Ok(())
            }
            Ok(Some(Command::Input(input))) => app.dispatch(input).map_err(anyhow::Error::from),
            Err(err) => Err(anyhow::Error::from(err)),
        };
        summary.executed += 1;
        if let Err(err) = outcome {
            summary.failed += 1;
            warn!(line = number, error = %err, "script: command failed");
            writeln!(out, "error: line {number}: {err}")?;
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use client_core::{BundleSource, FixedClock};

    fn parsed(line: &str) -> UserInput {
        match parse_command(line) {
            Ok(Some(Command::Input(input))) => input,
            other => panic!("unexpected parse result for '{line}': {other:?}"),
        }
    }

    #[test]
    fn parses_row_and_form_commands() {
        assert_eq!(
            parsed("fav 3"),
            UserInput::Row {
                id: EventId(3),
                input: RowInput::FavoriteClick
            }
        );
        assert_eq!(
            parsed("dest new  Saint Petersburg "),
            UserInput::Form {
                slot: EditorSlot::Create,
                input: FormInput::Destination("Saint Petersburg".to_string())
            }
        );
        assert_eq!(
            parsed("type 2 Check-In"),
            UserInput::Form {
                slot: EditorSlot::Event(EventId(2)),
                input: FormInput::EventType(EventType::CheckIn)
            }
        );
        assert_eq!(
            parsed("price 2"),
            UserInput::Form {
                slot: EditorSlot::Event(EventId(2)),
                input: FormInput::Price(String::new())
            }
        );
        assert_eq!(parsed("sort price"), UserInput::Sort(SortType::Price));
    }

    #[test]
    fn skips_blank_lines_and_comments() {
        assert_eq!(parse_command("   "), Ok(None));
        assert_eq!(parse_command("# open 1"), Ok(None));
        assert_eq!(parse_command("show"), Ok(Some(Command::Show)));
    }

    #[test]
    fn reports_bad_commands() {
        assert_eq!(
            parse_command("jump 1"),
            Err(ScriptError::UnknownCommand("jump".to_string()))
        );
        assert_eq!(
            parse_command("open"),
            Err(ScriptError::MissingArgument {
                command: "open",
                argument: "an event id"
            })
        );
        assert_eq!(
            parse_command("from 1 yesterday"),
            Err(ScriptError::InvalidArgument {
                argument: "timestamp",
                value: "yesterday".to_string()
            })
        );
        assert!(matches!(
            parse_command("filter someday"),
            Err(ScriptError::UnknownName(_))
        ));
    }

    #[test]
    fn failing_lines_do_not_stop_the_script() {
        let clock = Rc::new(FixedClock(
            "2024-01-01T12:00:00Z".parse().expect("timestamp"),
        ));
        let mut app = client_core::ItineraryApp::new(clock).expect("app");
        let source = BundleSource::from_json_str(
            r#"{"destinations": [{"id": 1, "name": "Oslo", "description": ""}],
                "events": [{"id": 1, "type": "ship", "base_price": 70,
                            "date_from": "2024-01-03T08:00:00Z", "date_to": "2024-01-03T20:00:00Z",
                            "destination": 1}]}"#,
        )
        .expect("bundle");
        app.load(&source).expect("load");

        let script = "open 9\nfav 1\nbogus\nshow\n";
        let mut out = Vec::new();
        let summary = run_script(&mut app, script.as_bytes(), &mut out).expect("run");

        assert_eq!(summary, ScriptSummary { executed: 4, failed: 2 });
        let printed = String::from_utf8(out).expect("utf8");
        assert!(printed.contains("error: line 1: no presenter for trip event 9"));
        assert!(printed.contains("error: line 3: unknown command 'bogus'"));
        assert!(printed.contains("| ★"));
    }
}
