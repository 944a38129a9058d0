//! Highlighting the question inside a card's example phrase.

use serde::Serialize;

/// A run of phrase text, marked when it matches the question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightSegment {
    pub text: String,
    pub highlighted: bool,
}

impl HighlightSegment {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlighted: false,
        }
    }

    fn marked(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlighted: true,
        }
    }
}

/// Split `phrase` into plain and highlighted segments for `question`.
///
/// A multi-word question is matched literally, ignoring case. A single-word
/// question marks every word sharing its first `max(1, len - 2)` characters,
/// so inflected forms are caught too.
pub fn highlight(phrase: &str, question: &str) -> Vec<HighlightSegment> {
    let question = question.trim();
    if question.is_empty() || phrase.is_empty() {
        return vec![HighlightSegment::plain(phrase)];
    }
    let segments = if question.contains(char::is_whitespace) {
        highlight_literal(phrase, question)
    } else {
        highlight_prefix(phrase, question)
    };
    merge(segments)
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

fn highlight_literal(phrase: &str, needle: &str) -> Vec<HighlightSegment> {
    let hay: Vec<(usize, char)> = phrase.char_indices().collect();
    let needle: Vec<char> = needle.chars().collect();
    let byte_at = |i: usize| hay.get(i).map_or(phrase.len(), |(b, _)| *b);

    let mut segments = Vec::new();
    let mut plain_from = 0;
    let mut i = 0;
    while i + needle.len() <= hay.len() {
        let hit = needle
            .iter()
            .zip(&hay[i..])
            .all(|(n, (_, h))| chars_eq_ignore_case(*n, *h));
        if hit {
            let (start, end) = (byte_at(i), byte_at(i + needle.len()));
            segments.push(HighlightSegment::plain(&phrase[plain_from..start]));
            segments.push(HighlightSegment::marked(&phrase[start..end]));
            plain_from = end;
            i += needle.len();
        } else {
            i += 1;
        }
    }
    segments.push(HighlightSegment::plain(&phrase[plain_from..]));
    segments
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn highlight_prefix(phrase: &str, question: &str) -> Vec<HighlightSegment> {
    let question = question.to_lowercase();
    let keep = question.chars().count().saturating_sub(2).max(1);
    let prefix: String = question.chars().take(keep).collect();

    let mut segments = Vec::new();
    let mut rest = phrase;
    while let Some(start) = rest.find(is_word_char) {
        let word_len = rest[start..]
            .find(|c: char| !is_word_char(c))
            .unwrap_or(rest.len() - start);
        let word = &rest[start..start + word_len];

        segments.push(HighlightSegment::plain(&rest[..start]));
        if word.to_lowercase().starts_with(&prefix) {
            segments.push(HighlightSegment::marked(word));
        } else {
            segments.push(HighlightSegment::plain(word));
        }
        rest = &rest[start + word_len..];
    }
    segments.push(HighlightSegment::plain(rest));
    segments
}

/// Drop empty runs and join neighbours of the same kind.
fn merge(segments: Vec<HighlightSegment>) -> Vec<HighlightSegment> {
    let mut merged: Vec<HighlightSegment> = Vec::new();
    for seg in segments.into_iter().filter(|s| !s.text.is_empty()) {
        match merged.last_mut() {
            Some(last) if last.highlighted == seg.highlighted && !seg.highlighted => last.text.push_str(&seg.text),
            _ => merged.push(seg),
        }
    }
    merged
}
