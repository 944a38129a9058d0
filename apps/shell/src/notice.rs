//! What the console shows after each event.

use qa_core::{HighlightSegment, Progress, StudyCounter};
use std::fmt;

/// The review card currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewView {
    pub card: usize,
    pub position: usize,
    pub batch_len: usize,
    pub question: String,
    pub answer: String,
    pub favourite: bool,
    pub tags: Vec<String>,
    pub progress: Progress,
}

/// The study card currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyView {
    pub card: usize,
    pub counter: StudyCounter,
    pub question: String,
    pub phrase: Vec<HighlightSegment>,
    pub options: [String; 2],
    pub favourite: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Info(String),
    Warning(String),
    Error(String),
    /// Auto-mode status line; `None` clears it.
    Status(Option<String>),
    Tags(Vec<(String, bool)>),
    Review(ReviewView),
    Study(StudyView),
    PassComplete(Progress),
    AnswerMarked { slot: usize, correct: bool },
}

fn progress_line(p: &Progress) -> String {
    format!(
        "reviewed {} ({}%) | in progress {} | remaining {} ({}%)",
        p.reviewed,
        p.pct_done(),
        p.in_progress,
        p.remaining,
        p.pct_remaining()
    )
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info(msg) => write!(f, "{msg}"),
            Self::Warning(msg) => write!(f, "warning: {msg}"),
            Self::Error(msg) => write!(f, "error: {msg}"),
            Self::Status(Some(msg)) => write!(f, "[{msg}]"),
            Self::Status(None) => write!(f, "[auto]"),
            Self::Tags(tags) => {
                let line: Vec<String> = tags
                    .iter()
                    .map(|(tag, on)| format!("[{}] {tag}", if *on { 'x' } else { ' ' }))
                    .collect();
                write!(f, "{}", line.join("  "))
            }
            Self::Review(v) => {
                let star = if v.favourite { " *" } else { "" };
                writeln!(f, "({}/{}){star} {}", v.position, v.batch_len, v.question)?;
                writeln!(f, "    {}", v.answer)?;
                if !v.tags.is_empty() {
                    writeln!(f, "    tags: {}", v.tags.join(", "))?;
                }
                write!(f, "    {}", progress_line(&v.progress))
            }
            Self::Study(v) => {
                let star = if v.favourite { " *" } else { "" };
                writeln!(
                    f,
                    "({}/{}) lot {}/{}{star} {}",
                    v.counter.position, v.counter.lot_len, v.counter.lot, v.counter.num_lots, v.question
                )?;
                if !v.phrase.is_empty() {
                    let phrase: String = v
                        .phrase
                        .iter()
                        .map(|s| if s.highlighted { format!("*{}*", s.text) } else { s.text.clone() })
                        .collect();
                    writeln!(f, "    {phrase}")?;
                }
                write!(f, "    1) {}    2) {}", v.options[0], v.options[1])
            }
            Self::PassComplete(p) => write!(f, "{}\n    {}", qa_core::review::COMPLETION_MESSAGE, progress_line(p)),
            Self::AnswerMarked { slot, correct } => {
                write!(f, "{}) {}", slot + 1, if *correct { "correct" } else { "wrong" })
            }
        }
    }
}
