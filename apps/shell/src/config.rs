//! Environment-driven configuration.

use qa_core::AutoSettings;
use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_TTS_URL: &str = "https://api.elevenlabs.io";
pub const DEFAULT_TTS_VOICE_ID: &str = "ohItIVrXTBI80RrUECOD";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub settings: AutoSettings,
    /// Fixed luma for the synthetic frame source. `None` means no camera.
    pub ambient_luma: Option<f64>,
    pub tts: Option<TtsConfig>,
    pub tesseract: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtsConfig {
    pub base_url: String,
    pub api_key: String,
    pub voice_id: String,
}

impl Config {
    /// Read `QA_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AutoSettings::default();
        let timer = parse_or(&lookup, "QA_TIMER_SECONDS", defaults.timer_seconds());
        let threshold = parse_or(&lookup, "QA_DARKNESS_THRESHOLD", defaults.darkness_threshold());
        let audio = lookup("QA_AUDIO").is_some_and(|v| matches!(v.trim(), "on" | "1" | "true"));

        let tts = lookup("QA_TTS_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .map(|api_key| TtsConfig {
                base_url: lookup("QA_TTS_URL").unwrap_or_else(|| DEFAULT_TTS_URL.into()),
                api_key,
                voice_id: lookup("QA_TTS_VOICE_ID").unwrap_or_else(|| DEFAULT_TTS_VOICE_ID.into()),
            });

        Self {
            db_path: lookup("QA_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(default_db_path),
            settings: AutoSettings::new(timer, threshold, audio),
            ambient_luma: lookup("QA_AMBIENT_LUMA").and_then(|v| parse_value("QA_AMBIENT_LUMA", &v)),
            tts,
            tesseract: lookup("QA_TESSERACT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("tesseract")),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|raw| parse_value(key, &raw))
        .unwrap_or(default)
}

fn parse_value<T: std::str::FromStr>(key: &str, raw: &str) -> Option<T> {
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = raw, "ignoring invalid setting");
            None
        }
    }
}

fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("qa-review")
        .join("qa-review.db")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let cfg = config(&[]);
        assert_eq!(cfg.settings.timer_seconds(), 2.0);
        assert_eq!(cfg.settings.darkness_threshold(), 20);
        assert!(!cfg.settings.audio_enabled);
        assert_eq!(cfg.ambient_luma, None);
        assert_eq!(cfg.tts, None);
        assert!(cfg.db_path.ends_with("qa-review/qa-review.db"));
    }

    #[test]
    fn values_are_clamped_and_invalid_ones_ignored() {
        let cfg = config(&[
            ("QA_TIMER_SECONDS", "90"),
            ("QA_DARKNESS_THRESHOLD", "dark"),
            ("QA_AUDIO", "on"),
            ("QA_AMBIENT_LUMA", "128.5"),
        ]);
        assert_eq!(cfg.settings.timer_seconds(), 60.0);
        assert_eq!(cfg.settings.darkness_threshold(), 20);
        assert!(cfg.settings.audio_enabled);
        assert_eq!(cfg.ambient_luma, Some(128.5));
    }

    #[test]
    fn speech_needs_an_api_key() {
        let cfg = config(&[("QA_TTS_API_KEY", "secret"), ("QA_TTS_VOICE_ID", "v1")]);
        let tts = cfg.tts.unwrap();
        assert_eq!(tts.base_url, DEFAULT_TTS_URL);
        assert_eq!(tts.voice_id, "v1");
        assert_eq!(config(&[("QA_TTS_API_KEY", " ")]).tts, None);
    }
}
