//! Review session tests: batching, resume and card editing.

mod common;

use common::fixtures::{self, DECK_FILE};
use common::{errors, infos, pump_for, reviews, run_lines, TestApp};
use pretty_assertions::assert_eq;
use qa_core::{Card, Progress};
use qa_shell::notice::Notice;
use std::time::Duration;

#[tokio::test]
async fn review_needs_a_selection() {
    let mut app = TestApp::new(fixtures::mixed_deck()).build();

    let notices = app.execute("review").await;

    assert_eq!(errors(&notices), vec!["please choose at least one filter"]);
    assert!(app.state().active.is_none());
}

#[tokio::test]
async fn commands_need_an_open_session() {
    let mut app = TestApp::new(fixtures::mixed_deck()).build();

    assert_eq!(errors(&app.execute("next").await), vec!["no session open"]);
    assert_eq!(errors(&app.execute("finish").await), vec!["no review session open"]);
    assert_eq!(errors(&app.execute("answer 1").await), vec!["no study session open"]);
}

#[tokio::test(start_paused = true)]
async fn batches_cover_every_card_once_per_pass() {
    let mut app = TestApp::new(fixtures::deck(fixtures::tagged_cards("verbs", 45))).build();

    let opened = run_lines(&mut app, &["select verbs", "review"]).await;
    assert!(infos(&opened).contains(&"Started review of 45 cards"));
    let first = reviews(&opened)[0];
    assert_eq!((first.position, first.batch_len), (1, 20));
    assert_eq!(
        first.progress,
        Progress { total: 45, reviewed: 0, in_progress: 20, remaining: 25 }
    );

    let mut seen = app.state().review.as_ref().unwrap().current_batch().to_vec();
    let second = app.execute("finish").await;
    assert_eq!(
        reviews(&second)[0].progress,
        Progress { total: 45, reviewed: 20, in_progress: 20, remaining: 5 }
    );
    seen.extend_from_slice(app.state().review.as_ref().unwrap().current_batch());

    let third = app.execute("finish").await;
    assert_eq!(reviews(&third)[0].batch_len, 5);
    seen.extend_from_slice(app.state().review.as_ref().unwrap().current_batch());
    seen.sort_unstable();
    assert_eq!(seen, (0..45).collect::<Vec<_>>());

    let done = app.execute("finish").await;
    assert_eq!(
        done,
        vec![Notice::PassComplete(Progress { total: 45, reviewed: 45, in_progress: 0, remaining: 0 })]
    );

    let next_pass = pump_for(&mut app, Duration::from_millis(1200)).await;
    let view = reviews(&next_pass)[0];
    assert_eq!(view.progress.reviewed, 0);
    assert_eq!(view.progress.in_progress, 20);
}

#[tokio::test(start_paused = true)]
async fn next_pass_starts_even_when_modal_closed() {
    let mut app = TestApp::new(fixtures::deck(fixtures::tagged_cards("verbs", 3))).build();

    run_lines(&mut app, &["select verbs", "review", "finish", "exit"]).await;
    let notices = pump_for(&mut app, Duration::from_millis(1200)).await;

    assert!(reviews(&notices).is_empty());
    let review = app.state().review.as_ref().unwrap();
    assert!(!review.is_pass_complete());
    assert_eq!(review.current_batch().len(), 3);
}

#[tokio::test]
async fn reopening_with_same_tags_resumes() {
    let mut app = TestApp::new(fixtures::deck(fixtures::tagged_cards("verbs", 30))).build();

    run_lines(&mut app, &["select verbs", "review", "next", "finish", "next", "next"]).await;
    let before = app.state().review.as_ref().unwrap().current_card();
    app.execute("exit").await;

    let notices = app.execute("review").await;

    assert_eq!(infos(&notices), vec!["Resumed review"]);
    let view = reviews(&notices)[0];
    assert_eq!(Some(view.card), before);
    assert_eq!(view.position, 3);
    assert_eq!(view.progress.reviewed, 20);
}

#[tokio::test]
async fn changing_tags_starts_over() {
    let mut app = TestApp::new(fixtures::mixed_deck()).build();

    run_lines(&mut app, &["select verbs", "review", "finish", "exit", "select nouns"]).await;
    let notices = app.execute("review").await;

    assert_eq!(infos(&notices), vec!["Started review of 5 cards"]);
    assert_eq!(reviews(&notices)[0].progress.reviewed, 0);
}

#[tokio::test]
async fn navigation_wraps_inside_the_batch() {
    let mut app = TestApp::new(fixtures::deck(fixtures::tagged_cards("verbs", 4))).build();
    run_lines(&mut app, &["select verbs", "review"]).await;

    let back = app.execute("prev").await;
    assert_eq!(reviews(&back)[0].position, 4);
    let forward = app.execute("next").await;
    assert_eq!(reviews(&forward)[0].position, 1);
}

#[tokio::test]
async fn faces_flip_to_their_backs() {
    let cards: Vec<Card> = serde_json::from_str(DECK_FILE).unwrap();
    let mut app = TestApp::new(fixtures::deck(cards)).build();
    run_lines(&mut app, &["select animals", "review"]).await;

    for _ in 0..2 {
        let question = app.state().deck.card(app.state().review.as_ref().unwrap().current_card().unwrap()).unwrap().question.clone();
        let flip_q = app.execute("flip-q").await;
        let flip_a = app.execute("flip-a").await;
        if question == "chien" {
            assert_eq!(infos(&flip_q), vec!["shyen"]);
            assert_eq!(infos(&flip_a), vec!["No meaning"]);
        } else {
            assert_eq!(infos(&flip_q), vec!["No pronunciation"]);
            assert_eq!(infos(&flip_a), vec!["small feline"]);
        }
        let moved = app.execute("next").await;
        assert_ne!(reviews(&moved)[0].question, question);
    }
}

#[tokio::test]
async fn reset_discards_progress() {
    let mut app = TestApp::new(fixtures::deck(fixtures::tagged_cards("verbs", 30))).build();
    run_lines(&mut app, &["select verbs", "review", "finish"]).await;

    let notices = app.execute("reset").await;

    assert_eq!(
        reviews(&notices)[0].progress,
        Progress { total: 30, reviewed: 0, in_progress: 20, remaining: 10 }
    );
}

#[tokio::test]
async fn favourites_and_tags_edit_the_current_card() {
    let mut app = TestApp::new(fixtures::mixed_deck()).build();
    run_lines(&mut app, &["select verbs", "review"]).await;
    let card = app.state().review.as_ref().unwrap().current_card().unwrap();

    assert_eq!(infos(&app.execute("star").await), vec!["Added to favourites"]);
    assert!(app.state().deck.is_favourite(card));
    assert_eq!(infos(&app.execute("tag  Past Tense ").await), vec!["Tagged past-tense (new tag)"]);
    assert_eq!(infos(&app.execute("tag verbs").await), vec!["Tagged verbs"]);
    assert_eq!(infos(&app.execute("untag past-tense").await), vec!["Removed tag past-tense"]);
    assert_eq!(errors(&app.execute("untag past-tense").await), vec!["card is not tagged past-tense"]);
    assert_eq!(infos(&app.execute("star").await), vec!["Removed from favourites"]);
    assert!(app.state().deck.tag_index().contains("past-tense"));
}

#[tokio::test]
async fn review_and_study_are_exclusive() {
    let mut app = TestApp::new(fixtures::mixed_deck()).build();
    run_lines(&mut app, &["select verbs", "review"]).await;

    assert_eq!(errors(&app.execute("study").await), vec!["close the review session first"]);

    run_lines(&mut app, &["exit", "study"]).await;
    assert_eq!(errors(&app.execute("review").await), vec!["close the study session first"]);
}

#[tokio::test]
async fn import_closes_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deck.json");
    std::fs::write(&path, DECK_FILE).unwrap();
    let mut app = TestApp::new(fixtures::mixed_deck()).build();
    run_lines(&mut app, &["select verbs", "select no-tag", "review"]).await;

    let notices = app.execute(&format!("import {}", path.display())).await;

    assert!(infos(&notices).contains(&"Closed review"));
    assert!(app.state().active.is_none());
    assert!(app.state().review.is_none());
    assert!(app.state().selected.contains("no-tag"));
    assert!(!app.state().selected.contains("verbs"));
}
