//! Deck builders shared by the console tests.

use qa_core::{Card, DeckStore};

/// `count` cards tagged `tag`, questions `q0..`, answers `a0..`.
pub fn tagged_cards(tag: &str, count: usize) -> Vec<Card> {
    (0..count)
        .map(|i| Card::new(format!("{tag} q{i}"), format!("{tag} a{i}")).with_tags([tag]))
        .collect()
}

pub fn deck(cards: Vec<Card>) -> DeckStore {
    DeckStore::from_cards(cards)
}

/// Two tags, `verbs` and `nouns`, plus one untagged card.
pub fn mixed_deck() -> DeckStore {
    let mut cards = tagged_cards("verbs", 3);
    cards.extend(tagged_cards("nouns", 2));
    cards.push(Card::new("lonely", "alone"));
    deck(cards)
}

/// Every card carries an audio clip.
pub fn spoken_deck(count: usize) -> DeckStore {
    let cards = tagged_cards("spoken", count)
        .into_iter()
        .map(|mut card| {
            card.phrase = Some(format!("say {}", card.question));
            card.audio_content = Some(vec![0xff, 0xfb, 0x90]);
            card
        })
        .collect();
    deck(cards)
}

pub const DECK_FILE: &str = r#"[
  {"question": "chien", "answer": "dog", "pronunciation": "shyen", "tag": "animals"},
  {"question": "chat", "answer": "cat", "meaning": "small feline", "tag": ["animals", "pets"]},
  {"question": "pain", "answer": "bread", "phrase": "du pain frais", "difficulty": 3}
]"#;
