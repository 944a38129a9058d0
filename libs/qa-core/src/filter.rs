//! Filter engine: derive the session's card subset from the selected tags.

use crate::error::{Result, ValidationError};
use crate::tags::{SelectedTags, NO_TAG};
use crate::types::Card;

/// Indices of the cards matching the selection, in deck order.
///
/// An empty selection is the identity filter. Otherwise a card matches when
/// `no-tag` is selected and the card has no tags, or when any of its tags is
/// selected.
pub fn filter_cards(cards: &[Card], selected: &SelectedTags) -> Vec<usize> {
    if selected.is_empty() {
        return (0..cards.len()).collect();
    }

    let want_untagged = selected.contains(NO_TAG);
    cards
        .iter()
        .enumerate()
        .filter(|(_, card)| {
            (want_untagged && card.is_untagged()) || card.tag.iter().any(|t| selected.contains(t))
        })
        .map(|(idx, _)| idx)
        .collect()
}

/// Filter for starting a session: at least one tag must be chosen and at
/// least one card must match.
pub fn filter_for_session(cards: &[Card], selected: &SelectedTags) -> Result<Vec<usize>> {
    if selected.is_empty() {
        return Err(ValidationError::EmptySelection);
    }
    let filtered = filter_cards(cards, selected);
    if filtered.is_empty() {
        return Err(ValidationError::NoMatchingCards);
    }
    Ok(filtered)
}
