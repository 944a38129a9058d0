//! Tag index and tag selection.

use crate::types::Card;
use std::collections::BTreeSet;

/// Synthetic tag standing for "cards with zero tags".
pub const NO_TAG: &str = "no-tag";

/// Reserved tag used to mark a card as a favourite.
pub const FAVOURITE_TAG: &str = "favourite";

/// Trim tag names and drop blank ones, keeping their order.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Canonical form of a user-typed tag name: trimmed, whitespace runs
/// replaced by `-`, lowercased. `None` for blank input.
pub fn normalize_tag_name(raw: &str) -> Option<String> {
    let words: Vec<&str> = raw.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }
    Some(words.join("-").to_lowercase())
}

/// All distinct tags observed across the deck.
///
/// `no-tag` is never stored; it is always offered first by [`TagIndex::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagIndex {
    tags: BTreeSet<String>,
}

impl TagIndex {
    /// Recompute from scratch.
    pub fn from_cards(cards: &[Card]) -> Self {
        let tags = cards
            .iter()
            .flat_map(|c| c.tag.iter())
            .filter(|t| t.as_str() != NO_TAG)
            .cloned()
            .collect();
        Self { tags }
    }

    /// Register a tag. Returns true when the tag was not known before.
    pub fn insert(&mut self, tag: &str) -> bool {
        if tag == NO_TAG {
            return false;
        }
        self.tags.insert(tag.to_string())
    }

    pub fn contains(&self, tag: &str) -> bool {
        tag == NO_TAG || self.tags.contains(tag)
    }

    /// Real tags, sorted.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// Filter choices: `no-tag` first, then every real tag sorted.
    pub fn list(&self) -> Vec<String> {
        std::iter::once(NO_TAG.to_string())
            .chain(self.tags.iter().cloned())
            .collect()
    }

    /// Number of real tags (excluding `no-tag`).
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// The single authoritative set of tags the user has chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedTags {
    tags: BTreeSet<String>,
}

impl SelectedTags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, tag: &str) -> bool {
        self.tags.insert(tag.to_string())
    }

    pub fn deselect(&mut self, tag: &str) -> bool {
        self.tags.remove(tag)
    }

    /// Flip a tag's membership; returns whether it is selected afterwards.
    pub fn toggle(&mut self, tag: &str) -> bool {
        if self.tags.remove(tag) {
            false
        } else {
            self.tags.insert(tag.to_string());
            true
        }
    }

    /// Select every choice the index offers, `no-tag` included.
    pub fn select_all(&mut self, index: &TagIndex) {
        self.tags = index.list().into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }

    /// True when every offered choice is selected (the "All" checkbox).
    pub fn all_selected(&self, index: &TagIndex) -> bool {
        index.list().iter().all(|t| self.tags.contains(t))
    }

    /// Drop selections that the index no longer offers.
    pub fn retain_known(&mut self, index: &TagIndex) {
        self.tags.retain(|t| index.contains(t));
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Sorted snapshot, used to recognise a resumable review session.
    pub fn sorted(&self) -> Vec<String> {
        self.tags.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for SelectedTags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().map(Into::into).collect(),
        }
    }
}
