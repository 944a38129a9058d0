//! Deck store: the card collection and its tag index.

use crate::error::{ImportError, Result, ValidationError};
use crate::tags::{normalize_tag_name, TagIndex, FAVOURITE_TAG};
use crate::types::{Card, CardDraft};

/// File name offered for export when the deck was not imported from a file.
pub const DEFAULT_EXPORT_NAME: &str = "qa_data_updated.json";

/// Owns the deck exclusively. Sessions refer to cards by index.
#[derive(Debug, Clone, Default)]
pub struct DeckStore {
    cards: Vec<Card>,
    tags: TagIndex,
    file_name: Option<String>,
}

/// Outcome of attaching a typed tag to a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagAdded {
    pub tag: String,
    /// The tag did not exist anywhere in the deck before.
    pub fresh: bool,
}

impl DeckStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        let tags = TagIndex::from_cards(&cards);
        Self {
            cards,
            tags,
            file_name: None,
        }
    }

    /// Parse a deck file and replace the deck wholesale.
    ///
    /// The text is fully parsed before anything is replaced, so a malformed
    /// file leaves the current deck untouched.
    pub fn import_json(&mut self, file_name: &str, text: &str) -> std::result::Result<usize, ImportError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        if !value.is_array() {
            return Err(ImportError::NotAnArray);
        }
        let cards: Vec<Card> = serde_json::from_value(value)?;

        let count = cards.len();
        *self = Self::from_cards(cards);
        self.file_name = Some(file_name.to_string()).filter(|n| !n.trim().is_empty());
        Ok(count)
    }

    /// Pretty-printed JSON array of the whole deck.
    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.cards)
    }

    /// Name to offer for export: the imported file's name, or a default.
    pub fn export_file_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or(DEFAULT_EXPORT_NAME)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn tag_index(&self) -> &TagIndex {
        &self.tags
    }

    /// Append a card built from the add-card form.
    pub fn add_card(&mut self, draft: CardDraft, audio: Option<Vec<u8>>) -> Result<usize> {
        let card = draft.into_card(audio)?;
        for tag in &card.tag {
            self.tags.insert(tag);
        }
        self.cards.push(card);
        Ok(self.cards.len() - 1)
    }

    /// Add the tag if missing, remove it if present. Returns whether the card
    /// carries the tag afterwards.
    pub fn toggle_tag(&mut self, index: usize, tag: &str) -> Result<bool> {
        let card = self.card_mut(index)?;
        let present = if let Some(pos) = card.tag.iter().position(|t| t == tag) {
            card.tag.remove(pos);
            false
        } else {
            card.tag.push(tag.to_string());
            true
        };
        self.tags.insert(tag);
        Ok(present)
    }

    /// Attach a user-typed tag to a card. Returns `Ok(None)` for blank input.
    pub fn add_tag(&mut self, index: usize, raw: &str) -> Result<Option<TagAdded>> {
        let Some(tag) = normalize_tag_name(raw) else {
            return Ok(None);
        };
        let card = self.card_mut(index)?;
        if !card.has_tag(&tag) {
            card.tag.push(tag.clone());
        }
        let fresh = self.tags.insert(&tag);
        Ok(Some(TagAdded { tag, fresh }))
    }

    /// Toggle the favourite marker. Returns whether the card is a favourite now.
    pub fn toggle_favourite(&mut self, index: usize) -> Result<bool> {
        self.toggle_tag(index, FAVOURITE_TAG)
    }

    pub fn is_favourite(&self, index: usize) -> bool {
        self.card(index).is_some_and(|c| c.has_tag(FAVOURITE_TAG))
    }

    fn card_mut(&mut self, index: usize) -> Result<&mut Card> {
        self.cards
            .get_mut(index)
            .ok_or(ValidationError::CardOutOfRange(index))
    }
}
