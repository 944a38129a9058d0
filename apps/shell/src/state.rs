//! Application state.

use crate::audio::AudioPlayer;
use crate::config::Config;
use crate::db::BlobStore;
use crate::ocr::{TesseractCli, TextExtractor};
use crate::sensor::{FixedFrameSource, FrameSource};
use crate::speech::{ElevenLabsClient, SpeechSynthesizer};
use qa_core::{AutoAdvance, AutoSettings, CardDraft, DeckStore, ReviewSession, SelectedTags, StudySession};
use std::sync::Arc;

/// The modal that is open. Review and study never coexist.
#[derive(Debug)]
pub enum ActiveSession {
    /// The session itself lives in [`AppState::review`] so it survives
    /// closing the modal.
    Review { auto: AutoAdvance },
    Study { session: StudySession, auto: AutoAdvance },
}

impl ActiveSession {
    pub fn auto_mut(&mut self) -> &mut AutoAdvance {
        match self {
            Self::Review { auto } | Self::Study { auto, .. } => auto,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Review { .. } => "review",
            Self::Study { .. } => "study",
        }
    }
}

/// Everything the console manipulates.
#[derive(Debug)]
pub struct AppState {
    pub deck: DeckStore,
    pub selected: SelectedTags,
    /// Last review session, kept for resuming.
    pub review: Option<ReviewSession>,
    pub active: Option<ActiveSession>,
    pub settings: AutoSettings,
    pub draft: CardDraft,
}

impl AppState {
    pub fn new(deck: DeckStore, settings: AutoSettings) -> Self {
        Self {
            deck,
            selected: SelectedTags::new(),
            review: None,
            active: None,
            settings,
            draft: CardDraft::default(),
        }
    }
}

/// External collaborators.
pub struct Services {
    pub store: Box<dyn BlobStore + Send>,
    pub speech: Option<Arc<dyn SpeechSynthesizer>>,
    pub ocr: Arc<dyn TextExtractor>,
    pub frames: Option<Arc<dyn FrameSource>>,
    pub player: Option<Arc<dyn AudioPlayer>>,
}

impl Services {
    pub fn from_config(config: &Config, store: Box<dyn BlobStore + Send>) -> Self {
        Self {
            store,
            speech: config
                .tts
                .clone()
                .map(|tts| Arc::new(ElevenLabsClient::new(tts)) as Arc<dyn SpeechSynthesizer>),
            ocr: Arc::new(TesseractCli::new(config.tesseract.clone())),
            frames: config
                .ambient_luma
                .map(|luma| Arc::new(FixedFrameSource::new(luma)) as Arc<dyn FrameSource>),
            player: None,
        }
    }
}
