//! Common test utilities for console integration tests.
//!
//! Provides:
//! - In-memory fakes for every external collaborator
//! - `TestApp` builder wiring them into an [`App`]
//! - Helpers that drive the event loop under a paused tokio clock

pub mod fixtures;

use async_trait::async_trait;
use qa_core::{AutoSettings, DeckStore, PlaybackError, SensorError, ServiceError};
use qa_shell::app::App;
use qa_shell::audio::AudioPlayer;
use qa_shell::db::{BlobStore, DbError};
use qa_shell::notice::{Notice, ReviewView, StudyView};
use qa_shell::ocr::TextExtractor;
use qa_shell::sensor::{Frame, FrameSource};
use qa_shell::speech::SpeechSynthesizer;
use qa_shell::state::{AppState, Services};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// Blob store shared with the test so saved data can be inspected.
#[derive(Clone, Default)]
pub struct MemoryStore {
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn deck(&self) -> Option<DeckStore> {
        use qa_shell::db::DeckRepository;
        self.load_deck().expect("stored deck is valid")
    }
}

impl BlobStore for MemoryStore {
    fn save(&self, key: &str, blob: &[u8]) -> Result<(), DbError> {
        self.blobs.lock().unwrap().insert(key.to_string(), blob.to_vec());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, DbError> {
        Ok(self.blobs.lock().unwrap().get(key).cloned())
    }
}

/// Speech synthesizer returning canned bytes, or failing.
pub struct FakeSpeech {
    pub result: Result<Vec<u8>, String>,
    pub calls: AtomicUsize,
}

impl FakeSpeech {
    pub fn ok(bytes: &[u8]) -> Arc<Self> {
        Arc::new(Self { result: Ok(bytes.to_vec()), calls: AtomicUsize::new(0) })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self { result: Err(message.to_string()), calls: AtomicUsize::new(0) })
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSpeech {
    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone().map_err(ServiceError::SpeechSynthesis)
    }
}

pub struct FakeOcr(pub Result<String, String>);

#[async_trait]
impl TextExtractor for FakeOcr {
    async fn extract_text(&self, _image: &[u8]) -> Result<String, ServiceError> {
        self.0.clone().map_err(ServiceError::TextExtraction)
    }
}

/// Camera whose brightness the test can change at any time.
#[derive(Clone)]
pub struct Lamp {
    level: Arc<AtomicU8>,
}

impl Lamp {
    pub fn new(level: u8) -> Self {
        Self { level: Arc::new(AtomicU8::new(level)) }
    }

    pub fn set(&self, level: u8) {
        self.level.store(level, Ordering::SeqCst);
    }
}

#[async_trait]
impl FrameSource for Lamp {
    async fn capture(&self) -> Result<Frame, SensorError> {
        Ok(Frame::uniform(4, 4, self.level.load(Ordering::SeqCst)))
    }
}

/// Player that "plays" every clip for a fixed time.
pub struct FakePlayer {
    pub length: Duration,
    pub fail: bool,
    pub played: AtomicUsize,
}

impl FakePlayer {
    pub fn new(length: Duration) -> Arc<Self> {
        Arc::new(Self { length, fail: false, played: AtomicUsize::new(0) })
    }

    pub fn broken() -> Arc<Self> {
        Arc::new(Self { length: Duration::ZERO, fail: true, played: AtomicUsize::new(0) })
    }
}

#[async_trait]
impl AudioPlayer for FakePlayer {
    async fn play(&self, _clip: Vec<u8>) -> Result<(), PlaybackError> {
        self.played.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(PlaybackError::Decode("not an mp3".into()));
        }
        tokio::time::sleep(self.length).await;
        Ok(())
    }
}

/// Builder for an [`App`] wired to fakes.
pub struct TestApp {
    deck: DeckStore,
    settings: AutoSettings,
    store: Box<dyn BlobStore + Send>,
    speech: Option<Arc<dyn SpeechSynthesizer>>,
    ocr: Arc<dyn TextExtractor>,
    frames: Option<Arc<dyn FrameSource>>,
    player: Option<Arc<dyn AudioPlayer>>,
}

impl TestApp {
    pub fn new(deck: DeckStore) -> Self {
        Self {
            deck,
            settings: AutoSettings::default(),
            store: Box::new(MemoryStore::default()),
            speech: None,
            ocr: Arc::new(FakeOcr(Err("no image".into()))),
            frames: None,
            player: None,
        }
    }

    pub fn settings(mut self, settings: AutoSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn store(mut self, store: impl BlobStore + Send + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    pub fn speech(mut self, speech: Arc<dyn SpeechSynthesizer>) -> Self {
        self.speech = Some(speech);
        self
    }

    pub fn ocr(mut self, ocr: impl TextExtractor + 'static) -> Self {
        self.ocr = Arc::new(ocr);
        self
    }

    pub fn camera(mut self, lamp: &Lamp) -> Self {
        self.frames = Some(Arc::new(lamp.clone()));
        self
    }

    pub fn player(mut self, player: Arc<dyn AudioPlayer>) -> Self {
        self.player = Some(player);
        self
    }

    pub fn build(self) -> App {
        let services = Services {
            store: self.store,
            speech: self.speech,
            ocr: self.ocr,
            frames: self.frames,
            player: self.player,
        };
        App::new(AppState::new(self.deck, self.settings), services).with_rng(ChaCha8Rng::seed_from_u64(42))
    }
}

/// Run several console lines, collecting every notice.
pub async fn run_lines(app: &mut App, lines: &[&str]) -> Vec<Notice> {
    let mut notices = Vec::new();
    for line in lines {
        notices.extend(app.execute(line).await);
    }
    notices
}

/// Handle loop events until `duration` of (paused) time has passed.
pub async fn pump_for(app: &mut App, duration: Duration) -> Vec<Notice> {
    let deadline = Instant::now() + duration;
    let mut notices = Vec::new();
    while let Ok(Some(event)) = tokio::time::timeout_at(deadline, app.next_event()).await {
        notices.extend(app.handle(event).await);
    }
    notices
}

pub fn reviews(notices: &[Notice]) -> Vec<&ReviewView> {
    notices
        .iter()
        .filter_map(|n| match n {
            Notice::Review(view) => Some(view),
            _ => None,
        })
        .collect()
}

pub fn studies(notices: &[Notice]) -> Vec<&StudyView> {
    notices
        .iter()
        .filter_map(|n| match n {
            Notice::Study(view) => Some(view),
            _ => None,
        })
        .collect()
}

pub fn errors(notices: &[Notice]) -> Vec<&str> {
    notices
        .iter()
        .filter_map(|n| match n {
            Notice::Error(msg) => Some(msg.as_str()),
            _ => None,
        })
        .collect()
}

pub fn statuses(notices: &[Notice]) -> Vec<Option<&str>> {
    notices
        .iter()
        .filter_map(|n| match n {
            Notice::Status(status) => Some(status.as_deref()),
            _ => None,
        })
        .collect()
}

pub fn infos(notices: &[Notice]) -> Vec<&str> {
    notices
        .iter()
        .filter_map(|n| match n {
            Notice::Info(msg) => Some(msg.as_str()),
            _ => None,
        })
        .collect()
}
