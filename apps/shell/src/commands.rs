//! Console commands.

use qa_core::{AnswerSlot, CardField, ImportError, ServiceError, ValidationError};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Import(PathBuf),
    Export(Option<PathBuf>),
    Tags,
    Select(String),
    Deselect(String),
    SelectAll,
    SelectNone,
    Count,
    Review,
    Study,
    Exit,
    Next,
    Prev,
    Finish,
    Reset,
    FlipQuestion,
    FlipAnswer,
    Star,
    Tag(String),
    Untag(String),
    Answer(AnswerSlot),
    LotNext,
    LotPrev,
    Auto,
    TimerUp,
    TimerDown,
    ThresholdUp,
    ThresholdDown,
    Audio,
    Draft(DraftCommand),
    Save,
    Ocr { field: CardField, image: PathBuf },
    Help,
    Quit,
}

/// Edits to the add-card form.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftCommand {
    Set(CardField, String),
    ToggleTag(String),
    NewTag(String),
    Show,
    Clear,
}

pub const HELP: &str = "\
import <path>          load a deck file
export [path]          write the deck as JSON
tags | select <t> | deselect <t> | all | none | count
review | study | exit
next | prev | finish | reset | flip-q | flip-a
star | tag <name> | untag <name>
answer <1|2> | lot-next | lot-prev
auto | timer+ | timer- | threshold+ | threshold- | audio
draft <field> <text> | draft tag <t> | draft new-tag <t> | draft show | draft clear
save | ocr <field> <png>
quit";

/// Error returned to the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandError {
    pub message: String,
}

impl CommandError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CommandError {}

impl From<ValidationError> for CommandError {
    fn from(e: ValidationError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<ImportError> for CommandError {
    fn from(e: ImportError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<ServiceError> for CommandError {
    fn from(e: ServiceError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<crate::db::DbError> for CommandError {
    fn from(e: crate::db::DbError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(e: serde_json::Error) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<std::io::Error> for CommandError {
    fn from(e: std::io::Error) -> Self {
        Self { message: e.to_string() }
    }
}

fn required(arg: &str, what: &str) -> Result<String, CommandError> {
    let arg = arg.trim();
    if arg.is_empty() {
        return Err(CommandError::new(format!("missing {what}")));
    }
    Ok(arg.to_string())
}

fn field(name: &str) -> Result<CardField, CommandError> {
    CardField::from_str(name).ok_or_else(|| CommandError::new(format!("unknown field: {name}")))
}

impl std::str::FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match verb {
            "import" => Self::Import(required(rest, "file path")?.into()),
            "export" => Self::Export((!rest.is_empty()).then(|| rest.into())),
            "tags" => Self::Tags,
            "select" => Self::Select(required(rest, "tag")?),
            "deselect" => Self::Deselect(required(rest, "tag")?),
            "all" => Self::SelectAll,
            "none" => Self::SelectNone,
            "count" => Self::Count,
            "review" => Self::Review,
            "study" => Self::Study,
            "exit" => Self::Exit,
            "next" => Self::Next,
            "prev" => Self::Prev,
            "finish" => Self::Finish,
            "reset" => Self::Reset,
            "flip-q" => Self::FlipQuestion,
            "flip-a" => Self::FlipAnswer,
            "star" => Self::Star,
            "tag" => Self::Tag(required(rest, "tag")?),
            "untag" => Self::Untag(required(rest, "tag")?),
            "answer" => {
                let slot = rest
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(AnswerSlot::from_index)
                    .ok_or_else(|| CommandError::new("answer must be 1 or 2"))?;
                Self::Answer(slot)
            }
            "lot-next" => Self::LotNext,
            "lot-prev" => Self::LotPrev,
            "auto" => Self::Auto,
            "timer+" => Self::TimerUp,
            "timer-" => Self::TimerDown,
            "threshold+" => Self::ThresholdUp,
            "threshold-" => Self::ThresholdDown,
            "audio" => Self::Audio,
            "draft" => Self::Draft(parse_draft(rest)?),
            "save" => Self::Save,
            "ocr" => {
                let (name, image) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| CommandError::new("usage: ocr <field> <png>"))?;
                Self::Ocr {
                    field: field(name)?,
                    image: required(image, "image path")?.into(),
                }
            }
            "help" | "?" => Self::Help,
            "quit" | "q" => Self::Quit,
            "" => return Err(CommandError::new("empty command")),
            other => return Err(CommandError::new(format!("unknown command: {other}"))),
        };
        Ok(command)
    }
}

fn parse_draft(rest: &str) -> Result<DraftCommand, CommandError> {
    let (sub, arg) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let arg = arg.trim();
    match sub {
        "show" | "" => Ok(DraftCommand::Show),
        "clear" => Ok(DraftCommand::Clear),
        "tag" => Ok(DraftCommand::ToggleTag(required(arg, "tag")?)),
        "new-tag" => Ok(DraftCommand::NewTag(required(arg, "tag")?)),
        name => Ok(DraftCommand::Set(field(name)?, arg.to_string())),
    }
}
