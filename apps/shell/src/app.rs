//! Single-threaded event loop.
//!
//! Every state change happens inside [`App::handle`], one event at a time.
//! Timers, the frame sampler and audio playback run as tokio tasks that only
//! post events back into the loop; they never touch state themselves.

use crate::commands::{Command, CommandError, DraftCommand, HELP};
use crate::db::DeckRepository;
use crate::notice::{Notice, ReviewView, StudyView};
use crate::state::{ActiveSession, AppState, Services};
use qa_core::review::COMPLETION_DELAY;
use qa_core::study::ANSWER_FEEDBACK_DELAY;
use qa_core::{
    filter_cards, highlight, AutoAdvance, AutoCursor, AutoToken, Card, Direction, Effect, FaceFlip,
    FinishOutcome, ImportError, PlaybackError, ReviewEntry, ReviewSession, SensorError, SessionMode, StudySession,
};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Inputs to the loop.
#[derive(Debug)]
pub enum Event {
    Line(String),
    TimerFired(AutoToken),
    AudioEnded(AutoToken),
    AudioFailed(AutoToken, PlaybackError),
    Frame(f64),
    SensorFailed(SensorError),
    PassDelayElapsed,
    FeedbackElapsed,
}

#[derive(Debug, Clone, Copy)]
enum AutoInput {
    Toggle,
    Timer(AutoToken),
    AudioEnded(AutoToken),
    AudioFailed(AutoToken),
    Frame(f64),
}

fn feed<C: AutoCursor>(auto: &mut AutoAdvance, cursor: &mut C, cards: &[Card], input: AutoInput) -> Vec<Effect> {
    match input {
        AutoInput::Toggle => auto.toggle(cursor, cards),
        AutoInput::Timer(token) => auto.timer_fired(token, cursor, cards),
        AutoInput::AudioEnded(token) => auto.audio_ended(token, cursor, cards),
        AutoInput::AudioFailed(token) => auto.audio_failed(token, cursor, cards),
        AutoInput::Frame(luma) => auto.frame_sampled(luma),
    }
}

#[derive(Default)]
struct Tasks {
    timer: Option<JoinHandle<()>>,
    sensor: Option<JoinHandle<()>>,
    audio: Option<JoinHandle<()>>,
}

impl Tasks {
    fn abort(slot: &mut Option<JoinHandle<()>>) {
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }
}

impl Drop for Tasks {
    fn drop(&mut self) {
        Self::abort(&mut self.timer);
        Self::abort(&mut self.sensor);
        Self::abort(&mut self.audio);
    }
}

pub struct App {
    state: AppState,
    services: Services,
    rng: Box<dyn RngCore + Send>,
    tx: UnboundedSender<Event>,
    rx: UnboundedReceiver<Event>,
    tasks: Tasks,
    quit: bool,
}

impl App {
    pub fn new(state: AppState, services: Services) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state,
            services,
            rng: Box::new(StdRng::from_entropy()),
            tx,
            rx,
            tasks: Tasks::default(),
            quit: false,
        }
    }

    /// Replace the random source, for reproducible sessions.
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn sender(&self) -> UnboundedSender<Event> {
        self.tx.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub async fn next_event(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Run one console line.
    pub async fn execute(&mut self, line: &str) -> Vec<Notice> {
        self.handle(Event::Line(line.to_string())).await
    }

    pub async fn handle(&mut self, event: Event) -> Vec<Notice> {
        match event {
            Event::Line(line) => {
                let result = match line.parse::<Command>() {
                    Ok(command) => self.command(command).await,
                    Err(e) => Err(e),
                };
                result.unwrap_or_else(|e| vec![Notice::Error(e.message)])
            }
            Event::TimerFired(token) => self.drive(AutoInput::Timer(token)),
            Event::AudioEnded(token) => self.drive(AutoInput::AudioEnded(token)),
            Event::AudioFailed(token, error) => {
                warn!(%error, "audio playback failed, falling back to timer");
                self.drive(AutoInput::AudioFailed(token))
            }
            Event::Frame(luma) => self.drive(AutoInput::Frame(luma)),
            Event::SensorFailed(error) => self.sensor_failed(error),
            Event::PassDelayElapsed => self.start_next_pass(),
            Event::FeedbackElapsed => self.resolve_answer(),
        }
    }

    async fn command(&mut self, command: Command) -> Result<Vec<Notice>, CommandError> {
        match command {
            Command::Import(path) => self.import(path).await,
            Command::Export(path) => self.export(path).await,
            Command::Tags => Ok(vec![self.tags_notice()]),
            Command::Select(tag) => {
                if !self.state.deck.tag_index().contains(&tag) {
                    return Err(CommandError::new(format!("unknown tag: {tag}")));
                }
                self.state.selected.select(&tag);
                Ok(vec![self.tags_notice()])
            }
            Command::Deselect(tag) => {
                self.state.selected.deselect(&tag);
                Ok(vec![self.tags_notice()])
            }
            Command::SelectAll => {
                self.state.selected.select_all(self.state.deck.tag_index());
                Ok(vec![self.tags_notice()])
            }
            Command::SelectNone => {
                self.state.selected.clear();
                Ok(vec![self.tags_notice()])
            }
            Command::Count => {
                let count = filter_cards(self.state.deck.cards(), &self.state.selected).len();
                Ok(vec![Notice::Info(format!("{count} cards match"))])
            }
            Command::Review => self.open_review(),
            Command::Study => self.open_study(),
            Command::Exit => {
                if self.state.active.is_none() {
                    return Err(no_session());
                }
                Ok(self.close_session())
            }
            Command::Next => self.navigate(Direction::Forward),
            Command::Prev => self.navigate(Direction::Backward),
            Command::Finish => self.finish_batch(),
            Command::Reset => {
                let review = review_in(&mut self.state)?;
                review.reset(&mut *self.rng);
                info!("review progress reset");
                Ok(self.render().into_iter().collect())
            }
            Command::FlipQuestion => self.flip(true),
            Command::FlipAnswer => self.flip(false),
            Command::Star => {
                let index = self.current_card()?;
                let favourite = self.state.deck.toggle_favourite(index)?;
                let mut notices = vec![Notice::Info(
                    if favourite { "Added to favourites" } else { "Removed from favourites" }.into(),
                )];
                notices.extend(self.persist());
                Ok(notices)
            }
            Command::Tag(raw) => {
                let index = self.current_card()?;
                let added = self
                    .state
                    .deck
                    .add_tag(index, &raw)?
                    .ok_or_else(|| CommandError::new("tag name is empty"))?;
                let note = if added.fresh { " (new tag)" } else { "" };
                let mut notices = vec![Notice::Info(format!("Tagged {}{note}", added.tag))];
                notices.extend(self.persist());
                Ok(notices)
            }
            Command::Untag(tag) => {
                let index = self.current_card()?;
                if !self.state.deck.card(index).is_some_and(|c| c.has_tag(&tag)) {
                    return Err(CommandError::new(format!("card is not tagged {tag}")));
                }
                self.state.deck.toggle_tag(index, &tag)?;
                let mut notices = vec![Notice::Info(format!("Removed tag {tag}"))];
                notices.extend(self.persist());
                Ok(notices)
            }
            Command::Answer(slot) => {
                let session = self.study_mut()?;
                let correct = session
                    .select_answer(slot)
                    .ok_or_else(|| CommandError::new("no answers are showing"))?;
                self.post_after(ANSWER_FEEDBACK_DELAY, Event::FeedbackElapsed);
                Ok(vec![Notice::AnswerMarked { slot: slot.index(), correct }])
            }
            Command::LotNext => self.change_lot(true),
            Command::LotPrev => self.change_lot(false),
            Command::Auto => {
                if self.state.active.is_none() {
                    return Err(no_session());
                }
                let mut notices = self.drive(AutoInput::Toggle);
                let on = self.state.active.as_mut().is_some_and(|s| s.auto_mut().is_active());
                info!(on, "auto mode toggled");
                notices.insert(0, Notice::Info(if on { "Auto mode on" } else { "Auto mode off" }.into()));
                Ok(notices)
            }
            Command::TimerUp => Ok(self.change_timer(true)),
            Command::TimerDown => Ok(self.change_timer(false)),
            Command::ThresholdUp => Ok(self.change_threshold(true)),
            Command::ThresholdDown => Ok(self.change_threshold(false)),
            Command::Audio => {
                let enabled = self.state.settings.toggle_audio();
                if let Some(auto) = self.auto_mut() {
                    auto.set_audio_enabled(enabled);
                }
                Ok(vec![Notice::Info(format!("Audio {}", if enabled { "on" } else { "off" }))])
            }
            Command::Draft(edit) => Ok(self.edit_draft(edit)),
            Command::Save => self.save_draft().await,
            Command::Ocr { field, image } => {
                let bytes = tokio::fs::read(&image).await?;
                let text = self.services.ocr.extract_text(&bytes).await?;
                self.state.draft.set_field(field, text.trim());
                Ok(vec![Notice::Info(format!("{}: {}", field.as_str(), self.state.draft.field(field)))])
            }
            Command::Help => Ok(vec![Notice::Info(HELP.into())]),
            Command::Quit => {
                self.quit = true;
                Ok(self.close_session())
            }
        }
    }

    async fn import(&mut self, path: PathBuf) -> Result<Vec<Notice>, CommandError> {
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ImportError::Unreadable(e.to_string()))?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let count = self.state.deck.import_json(&name, &text)?;
        info!(count, file = %name, "deck imported");

        let mut notices = self.close_session();
        self.state.review = None;
        self.state.selected.retain_known(self.state.deck.tag_index());
        notices.push(Notice::Info(format!("Imported {count} cards from {name}")));
        notices.extend(self.persist());
        notices.push(self.tags_notice());
        Ok(notices)
    }

    async fn export(&mut self, path: Option<PathBuf>) -> Result<Vec<Notice>, CommandError> {
        let path = path.unwrap_or_else(|| PathBuf::from(self.state.deck.export_file_name()));
        let json = self.state.deck.export_json()?;
        tokio::fs::write(&path, json).await?;
        info!(path = %path.display(), "deck exported");
        Ok(vec![Notice::Info(format!(
            "Exported {} cards to {}",
            self.state.deck.len(),
            path.display()
        ))])
    }

    fn open_review(&mut self) -> Result<Vec<Notice>, CommandError> {
        self.ensure_closed()?;
        let (session, entry) = ReviewSession::resume_or_start(
            self.state.review.clone(),
            self.state.deck.cards(),
            &self.state.selected,
            &mut *self.rng,
        )?;
        let total = session.filtered().len();
        let started_at = session.started_at();
        self.state.review = Some(session);
        self.state.active = Some(ActiveSession::Review {
            auto: self.new_auto(SessionMode::Review),
        });
        info!(?entry, total, %started_at, "review session opened");

        let opening = match entry {
            ReviewEntry::Resumed => "Resumed review".to_string(),
            ReviewEntry::Started => format!("Started review of {total} cards"),
        };
        let mut notices = vec![Notice::Info(opening)];
        notices.extend(self.render());
        Ok(notices)
    }

    fn open_study(&mut self) -> Result<Vec<Notice>, CommandError> {
        self.ensure_closed()?;
        let session = StudySession::start(self.state.deck.cards(), &self.state.selected, &mut *self.rng)?;
        let total = session.order().len();
        self.state.active = Some(ActiveSession::Study {
            session,
            auto: self.new_auto(SessionMode::Study),
        });
        info!(total, "study session opened");

        let mut notices = vec![Notice::Info(format!("Studying {total} cards"))];
        notices.extend(self.render());
        Ok(notices)
    }

    fn new_auto(&self, mode: SessionMode) -> AutoAdvance {
        AutoAdvance::new(mode, self.state.settings, self.services.player.is_some())
    }

    fn ensure_closed(&self) -> Result<(), CommandError> {
        match &self.state.active {
            Some(open) => Err(CommandError::new(format!("close the {} session first", open.name()))),
            None => Ok(()),
        }
    }

    /// Close the open modal, stopping auto mode. The review session stays
    /// behind for resuming.
    fn close_session(&mut self) -> Vec<Notice> {
        let Some(mut active) = self.state.active.take() else {
            return Vec::new();
        };
        let effects = active.auto_mut().exit();
        info!(session = active.name(), "session closed");
        let mut notices = self.apply(effects);
        notices.push(Notice::Info(format!("Closed {}", active.name())));
        notices
    }

    fn navigate(&mut self, direction: Direction) -> Result<Vec<Notice>, CommandError> {
        match &mut self.state.active {
            Some(ActiveSession::Review { .. }) => {
                let review = self.state.review.as_mut().ok_or_else(no_session)?;
                match direction {
                    Direction::Forward => review.next(),
                    Direction::Backward => review.prev(),
                }
            }
            Some(ActiveSession::Study { session, .. }) => session.flip(direction),
            None => return Err(no_session()),
        }
        Ok(self.render().into_iter().collect())
    }

    fn finish_batch(&mut self) -> Result<Vec<Notice>, CommandError> {
        let review = review_in(&mut self.state)?;
        match review.finish_batch(&mut *self.rng) {
            FinishOutcome::NextBatch => Ok(self.render().into_iter().collect()),
            FinishOutcome::PassComplete => {
                let progress = review.progress();
                info!(total = progress.total, "review pass complete");
                self.post_after(COMPLETION_DELAY, Event::PassDelayElapsed);
                Ok(vec![Notice::PassComplete(progress)])
            }
        }
    }

    fn start_next_pass(&mut self) -> Vec<Notice> {
        let Some(review) = self.state.review.as_mut() else {
            return Vec::new();
        };
        if !review.is_pass_complete() {
            return Vec::new();
        }
        review.start_next_pass(&mut *self.rng);
        info!("next review pass started");
        match self.state.active {
            Some(ActiveSession::Review { .. }) => self.render().into_iter().collect(),
            _ => Vec::new(),
        }
    }

    fn flip(&mut self, question: bool) -> Result<Vec<Notice>, CommandError> {
        if !matches!(self.state.active, Some(ActiveSession::Review { .. })) {
            return Err(CommandError::new("flipping is only available in review"));
        }
        let review = self.state.review.as_mut().ok_or_else(no_session)?;
        let card = review
            .current_card()
            .and_then(|i| self.state.deck.card(i))
            .ok_or_else(no_card)?;
        let flip = if question {
            review.faces_mut().flip_question(card)
        } else {
            review.faces_mut().flip_answer(card)
        };
        let text = match flip {
            FaceFlip::Shown(text) => text,
            FaceFlip::NoBack(note) => note.to_string(),
        };
        Ok(vec![Notice::Info(text)])
    }

    fn change_lot(&mut self, forward: bool) -> Result<Vec<Notice>, CommandError> {
        let session = self.study_mut()?;
        if forward {
            session.next_lot();
        } else {
            session.prev_lot();
        }
        Ok(self.render().into_iter().collect())
    }

    /// Step the timer; a pending auto wait restarts with the new interval.
    fn change_timer(&mut self, up: bool) -> Vec<Notice> {
        let seconds = if up {
            self.state.settings.increase_timer()
        } else {
            self.state.settings.decrease_timer()
        };
        let effects = self.auto_mut().map(|a| a.set_timer_seconds(seconds)).unwrap_or_default();
        let mut notices = vec![Notice::Info(format!("Timer: {seconds}s"))];
        notices.extend(self.apply(effects));
        notices
    }

    fn change_threshold(&mut self, up: bool) -> Vec<Notice> {
        let threshold = if up {
            self.state.settings.increase_threshold()
        } else {
            self.state.settings.decrease_threshold()
        };
        if let Some(auto) = self.auto_mut() {
            auto.set_darkness_threshold(threshold);
        }
        vec![Notice::Info(format!("Darkness threshold: {threshold}"))]
    }

    fn resolve_answer(&mut self) -> Vec<Notice> {
        let Some(ActiveSession::Study { session, .. }) = &mut self.state.active else {
            return Vec::new();
        };
        if session.resolve_selection() {
            self.render().into_iter().collect()
        } else {
            Vec::new()
        }
    }

    fn edit_draft(&mut self, edit: DraftCommand) -> Vec<Notice> {
        let draft = &mut self.state.draft;
        match edit {
            DraftCommand::Set(field, text) => draft.set_field(field, text),
            DraftCommand::ToggleTag(tag) => draft.toggle_tag(&tag),
            DraftCommand::NewTag(raw) => {
                if let Some(tag) = draft.add_new_tag(&raw) {
                    if !self.state.deck.tag_index().contains(&tag) {
                        return vec![Notice::Info(format!("New tag {tag} selected"))];
                    }
                }
            }
            DraftCommand::Clear => *draft = Default::default(),
            DraftCommand::Show => {}
        }
        let d = &self.state.draft;
        vec![Notice::Info(format!(
            "question: {}\nanswer: {}\npronunciation: {}\nphrase: {}\nmeaning: {}\ntags: {}",
            d.question,
            d.answer,
            d.pronunciation,
            d.phrase,
            d.meaning,
            d.tags.join(", ")
        ))]
    }

    /// Validate the draft, synthesize phrase audio, then add the card.
    async fn save_draft(&mut self) -> Result<Vec<Notice>, CommandError> {
        self.state.draft.clone().into_card(None)?;

        let mut notices = Vec::new();
        let audio = match (self.state.draft.phrase_for_speech(), &self.services.speech) {
            (Some(phrase), Some(speech)) => match speech.synthesize(phrase).await {
                Ok(bytes) => Some(bytes),
                Err(error) => {
                    warn!(%error, "speech synthesis failed, saving card without audio");
                    notices.push(Notice::Warning(format!("{error}; card saved without audio")));
                    None
                }
            },
            _ => None,
        };

        let draft = std::mem::take(&mut self.state.draft);
        let index = self.state.deck.add_card(draft, audio)?;
        info!(index, "card added");
        notices.insert(0, Notice::Info(format!("Card added ({} total)", self.state.deck.len())));
        notices.extend(self.persist());
        Ok(notices)
    }

    fn persist(&self) -> Option<Notice> {
        match self.services.store.save_deck(&self.state.deck) {
            Ok(()) => {
                debug!(cards = self.state.deck.len(), "deck saved");
                None
            }
            Err(error) => {
                warn!(%error, "failed to save deck");
                Some(Notice::Warning(format!("could not save deck: {error}")))
            }
        }
    }

    fn tags_notice(&self) -> Notice {
        let tags = self
            .state
            .deck
            .tag_index()
            .list()
            .into_iter()
            .map(|tag| {
                let on = self.state.selected.contains(&tag);
                (tag, on)
            })
            .collect();
        Notice::Tags(tags)
    }

    fn study_mut(&mut self) -> Result<&mut StudySession, CommandError> {
        match &mut self.state.active {
            Some(ActiveSession::Study { session, .. }) => Ok(session),
            _ => Err(CommandError::new("no study session open")),
        }
    }

    fn auto_mut(&mut self) -> Option<&mut AutoAdvance> {
        self.state.active.as_mut().map(ActiveSession::auto_mut)
    }

    /// Deck index of the card on screen.
    fn current_card(&self) -> Result<usize, CommandError> {
        let index = match &self.state.active {
            Some(ActiveSession::Review { .. }) => self.state.review.as_ref().and_then(|r| r.current_card()),
            Some(ActiveSession::Study { session, .. }) => session.current_card(),
            None => return Err(no_session()),
        };
        index.ok_or_else(no_card)
    }

    fn render(&mut self) -> Option<Notice> {
        let cards = self.state.deck.cards();
        match &mut self.state.active {
            Some(ActiveSession::Review { .. }) => {
                let review = self.state.review.as_ref()?;
                let index = review.current_card()?;
                let card = cards.get(index)?;
                let (position, batch_len) = review.counter()?;
                Some(Notice::Review(ReviewView {
                    card: index,
                    position,
                    batch_len,
                    question: review.faces().question_text(card).to_string(),
                    answer: review.faces().answer_text(card).to_string(),
                    favourite: self.state.deck.is_favourite(index),
                    tags: card.tag.clone(),
                    progress: review.progress(),
                }))
            }
            Some(ActiveSession::Study { session, .. }) => {
                let index = session.current_card()?;
                let card = cards.get(index)?;
                if session.answers().is_none() {
                    session.deal_answers(cards, &mut *self.rng);
                }
                let options = session.answers()?.options.clone();
                Some(Notice::Study(StudyView {
                    card: index,
                    counter: session.counter()?,
                    question: card.question.clone(),
                    phrase: card.phrase_text().map(|p| highlight(p, &card.question)).unwrap_or_default(),
                    options,
                    favourite: self.state.deck.is_favourite(index),
                }))
            }
            None => None,
        }
    }

    /// Feed an auto-mode input to the open session and carry out the result.
    fn drive(&mut self, input: AutoInput) -> Vec<Notice> {
        let cards = self.state.deck.cards();
        let effects = match &mut self.state.active {
            Some(ActiveSession::Review { auto }) => match self.state.review.as_mut() {
                Some(review) => feed(auto, review, cards, input),
                None => Vec::new(),
            },
            Some(ActiveSession::Study { session, auto }) => feed(auto, session, cards, input),
            None => Vec::new(),
        };
        self.apply(effects)
    }

    fn sensor_failed(&mut self, error: SensorError) -> Vec<Notice> {
        warn!(%error, "camera unavailable, auto mode disabled");
        let effects = self
            .auto_mut()
            .map(|auto| auto.sensor_unavailable(error.to_string()))
            .unwrap_or_default();
        self.apply(effects)
    }

    fn apply(&mut self, effects: Vec<Effect>) -> Vec<Notice> {
        let mut notices = Vec::new();
        let mut sensor_error = None;

        for effect in effects {
            match effect {
                Effect::StartSensor { interval } => match self.services.frames.clone() {
                    Some(source) => self.start_sensor(source, interval),
                    None => sensor_error = Some(SensorError::Unavailable("no camera configured".into())),
                },
                Effect::StopSensor => Tasks::abort(&mut self.tasks.sensor),
                Effect::ScheduleTimer { token, after } => {
                    debug!(?token, ?after, "auto timer scheduled");
                    Tasks::abort(&mut self.tasks.timer);
                    let tx = self.tx.clone();
                    self.tasks.timer = Some(tokio::spawn(async move {
                        tokio::time::sleep(after).await;
                        let _ = tx.send(Event::TimerFired(token));
                    }));
                }
                Effect::CancelTimer => Tasks::abort(&mut self.tasks.timer),
                Effect::PlayAudio { token, card } => self.play_audio(token, card),
                Effect::StopAudio => Tasks::abort(&mut self.tasks.audio),
                Effect::Advanced => notices.extend(self.render()),
                Effect::Status(status) => notices.push(Notice::Status(status.message().map(str::to_string))),
            }
        }

        if let Some(error) = sensor_error {
            notices.extend(self.sensor_failed(error));
        }
        notices
    }

    fn start_sensor(&mut self, source: Arc<dyn crate::sensor::FrameSource>, interval: Duration) {
        Tasks::abort(&mut self.tasks.sensor);
        let tx = self.tx.clone();
        self.tasks.sensor = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                match source.capture().await {
                    Ok(frame) => {
                        let Some(luma) = frame.luma() else { continue };
                        if tx.send(Event::Frame(luma)).is_err() {
                            break;
                        }
                    }
                    Err(error) => {
                        let _ = tx.send(Event::SensorFailed(error));
                        break;
                    }
                }
            }
        }));
    }

    fn play_audio(&mut self, token: AutoToken, card: usize) {
        Tasks::abort(&mut self.tasks.audio);
        let clip = self.state.deck.card(card).and_then(|c| c.audio_content.clone());
        let tx = self.tx.clone();
        match (self.services.player.clone(), clip) {
            (Some(player), Some(clip)) => {
                debug!(?token, card, "playing card audio");
                self.tasks.audio = Some(tokio::spawn(async move {
                    let event = match player.play(clip).await {
                        Ok(()) => Event::AudioEnded(token),
                        Err(error) => Event::AudioFailed(token, error),
                    };
                    let _ = tx.send(event);
                }));
            }
            _ => {
                let _ = tx.send(Event::AudioFailed(token, PlaybackError::Play("no audio engine".into())));
            }
        }
    }

    fn post_after(&self, delay: Duration, event: Event) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(event);
        });
    }
}

/// The review session, provided the review modal is open.
fn review_in(state: &mut AppState) -> Result<&mut ReviewSession, CommandError> {
    if !matches!(state.active, Some(ActiveSession::Review { .. })) {
        return Err(CommandError::new("no review session open"));
    }
    state.review.as_mut().ok_or_else(no_session)
}

fn no_session() -> CommandError {
    CommandError::new("no session open")
}

fn no_card() -> CommandError {
    CommandError::new("no card is showing")
}
