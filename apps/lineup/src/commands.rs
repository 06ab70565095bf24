//! Line protocol read from stdin.

use anyhow::{anyhow, bail, Result};
use lineup_core::{DropEvent, LineupCommand};
use shared::domain::{EntryId, ListKind};

pub const HELP: &str = "\
commands:
  load                      refetch the roster
  mode                      toggle select/list mode
  search <text> | clear     filter by name
  stage-left <id>           toggle an unselected entry
  stage-right <id>          toggle a selected entry
  select-all | clear-left | clear-right
  add | remove              move staged entries right / left
  add-all | remove-all      move every visible entry right / left
  check <id> | uncheck <id> list-mode quick add / remove
  drag <list> <from> <list> <to>
                            reorder or transfer (lists: starters, bench)
  play <id>                 play / pause an entry
  next | stop
  volume <0-100>
  quit";

fn id(rest: &str) -> Result<EntryId> {
    let rest = rest.trim();
    if rest.is_empty() {
        bail!("missing entry id");
    }
    Ok(EntryId::from(rest))
}

fn list_kind(word: &str) -> Result<ListKind> {
    match word {
        "starters" | "s" => Ok(ListKind::Starters),
        "bench" | "b" => Ok(ListKind::Bench),
        other => Err(anyhow!("unknown list {other}")),
    }
}

fn index(word: &str) -> Result<usize> {
    word.parse()
        .map_err(|_| anyhow!("expected an index, got {word}"))
}

fn drop_event(rest: &str) -> Result<DropEvent> {
    let words: Vec<&str> = rest.split_whitespace().collect();
    let [from, from_index, to, to_index] = words.as_slice() else {
        bail!("usage: drag <list> <from> <list> <to>");
    };
    Ok(DropEvent {
        from: list_kind(from)?,
        to: list_kind(to)?,
        from_index: index(from_index)?,
        to_index: index(to_index)?,
    })
}

/// `Ok(None)` for blank lines.
pub fn parse_command(line: &str) -> Result<Option<LineupCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));

    let command = match verb {
        "load" => LineupCommand::Load,
        "mode" => LineupCommand::ToggleMode,
        "search" => LineupCommand::SetQuery(rest.to_string()),
        "clear" => LineupCommand::ClearQuery,
        "stage-left" => LineupCommand::ToggleLeft(id(rest)?),
        "stage-right" => LineupCommand::ToggleRight(id(rest)?),
        "select-all" => LineupCommand::SelectAllLeft,
        "clear-left" => LineupCommand::ClearLeft,
        "clear-right" => LineupCommand::ClearRight,
        "add" => LineupCommand::MoveSelectedToRight,
        "remove" => LineupCommand::MoveSelectedToLeft,
        "add-all" => LineupCommand::MoveAllToRight,
        "remove-all" => LineupCommand::MoveAllToLeft,
        "check" => LineupCommand::TogglePlayer {
            id: id(rest)?,
            checked: true,
        },
        "uncheck" => LineupCommand::TogglePlayer {
            id: id(rest)?,
            checked: false,
        },
        "drag" => LineupCommand::Drop(drop_event(rest)?),
        "play" => LineupCommand::Toggle(id(rest)?),
        "next" => LineupCommand::Next,
        "stop" => LineupCommand::Stop,
        "volume" => {
            let raw = rest
                .trim()
                .parse::<f64>()
                .map_err(|_| anyhow!("expected a number, got {rest}"))?;
            LineupCommand::SetVolume(raw)
        }
        "quit" | "exit" => LineupCommand::Shutdown,
        other => bail!("unknown command {other}, try help"),
    };
    Ok(Some(command))
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
