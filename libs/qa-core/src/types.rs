//! Core types for the question/answer deck.

use crate::error::ValidationError;
use crate::tags::{normalize_tag_name, normalize_tags};
use serde::{Deserialize, Deserializer, Serialize};

/// A single question/answer card.
///
/// Field names match the deck file format. Fields this crate does not know
/// about are kept in `extra` so an import/export round trip loses nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phrase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meaning: Option<String>,
    /// Normalized on read: a bare string becomes one tag, missing or blank
    /// entries are dropped.
    #[serde(default, deserialize_with = "deserialize_tag_field")]
    pub tag: Vec<String>,
    /// Synthesized phrase audio, stored as base64 text in the deck file.
    #[serde(
        rename = "audioContent",
        default,
        skip_serializing_if = "Option::is_none",
        with = "audio_base64"
    )]
    pub audio_content: Option<Vec<u8>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Card {
    /// Create a card with just a question and an answer.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            pronunciation: None,
            phrase: None,
            meaning: None,
            tag: Vec::new(),
            audio_content: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Builder-style tag assignment, normalizing the given names.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tag = normalize_tags(tags);
        self
    }

    /// True when the card carries no tags (matched by the synthetic `no-tag`).
    pub fn is_untagged(&self) -> bool {
        self.tag.is_empty()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag.iter().any(|t| t == tag)
    }

    pub fn has_audio(&self) -> bool {
        self.audio_content.as_ref().is_some_and(|a| !a.is_empty())
    }

    /// Pronunciation shown on the back of the question face.
    pub fn pronunciation_text(&self) -> Option<&str> {
        non_empty(self.pronunciation.as_deref())
    }

    /// Meaning shown on the back of the answer face.
    pub fn meaning_text(&self) -> Option<&str> {
        non_empty(self.meaning.as_deref())
    }

    pub fn phrase_text(&self) -> Option<&str> {
        non_empty(self.phrase.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TagField {
    One(String),
    Many(Vec<String>),
}

fn deserialize_tag_field<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<TagField>::deserialize(deserializer)?;
    Ok(match raw {
        Some(TagField::One(tag)) => normalize_tags([tag]),
        Some(TagField::Many(tags)) => normalize_tags(tags),
        None => Vec::new(),
    })
}

mod audio_base64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(bytes) => serializer.serialize_str(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = Option::<String>::deserialize(deserializer)?;
        match encoded.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => STANDARD.decode(text).map(Some).map_err(de::Error::custom),
        }
    }
}

/// Editable card field, used by the add-card form and text extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardField {
    Question,
    Answer,
    Pronunciation,
    Phrase,
    Meaning,
}

impl CardField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Question => "question",
            Self::Answer => "answer",
            Self::Pronunciation => "pronunciation",
            Self::Phrase => "phrase",
            Self::Meaning => "meaning",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "question" => Some(Self::Question),
            "answer" => Some(Self::Answer),
            "pronunciation" => Some(Self::Pronunciation),
            "phrase" => Some(Self::Phrase),
            "meaning" => Some(Self::Meaning),
            _ => None,
        }
    }
}

/// A card being composed in the add-card form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardDraft {
    pub question: String,
    pub answer: String,
    pub pronunciation: String,
    pub phrase: String,
    pub meaning: String,
    pub tags: Vec<String>,
}

impl CardDraft {
    pub fn set_field(&mut self, field: CardField, text: impl Into<String>) {
        let text = text.into();
        match field {
            CardField::Question => self.question = text,
            CardField::Answer => self.answer = text,
            CardField::Pronunciation => self.pronunciation = text,
            CardField::Phrase => self.phrase = text,
            CardField::Meaning => self.meaning = text,
        }
    }

    pub fn field(&self, field: CardField) -> &str {
        match field {
            CardField::Question => &self.question,
            CardField::Answer => &self.answer,
            CardField::Pronunciation => &self.pronunciation,
            CardField::Phrase => &self.phrase,
            CardField::Meaning => &self.meaning,
        }
    }

    /// Select or unselect an existing tag for the new card.
    pub fn toggle_tag(&mut self, tag: &str) {
        if let Some(pos) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(pos);
        } else {
            self.tags.push(tag.to_string());
        }
    }

    /// Introduce a brand-new tag and select it. Returns the normalized name,
    /// or `None` when the input was blank.
    pub fn add_new_tag(&mut self, raw: &str) -> Option<String> {
        let tag = normalize_tag_name(raw)?;
        if !self.tags.contains(&tag) {
            self.tags.push(tag.clone());
        }
        Some(tag)
    }

    /// Phrase to synthesize audio for, if any.
    pub fn phrase_for_speech(&self) -> Option<&str> {
        non_empty(Some(self.phrase.as_str()))
    }

    /// Validate and convert into a card.
    pub fn into_card(self, audio: Option<Vec<u8>>) -> Result<Card, ValidationError> {
        let question = self.question.trim();
        if question.is_empty() {
            return Err(ValidationError::MissingField("question"));
        }
        let answer = self.answer.trim();
        if answer.is_empty() {
            return Err(ValidationError::MissingField("answer"));
        }

        let optional = |value: &str| {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        };

        Ok(Card {
            question: question.to_string(),
            answer: answer.to_string(),
            pronunciation: optional(&self.pronunciation),
            phrase: optional(&self.phrase),
            meaning: optional(&self.meaning),
            tag: normalize_tags(self.tags),
            audio_content: audio.filter(|a| !a.is_empty()),
            extra: serde_json::Map::new(),
        })
    }
}
