//! Text extraction from cropped card images.

use async_trait::async_trait;
use qa_core::ServiceError;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Recognise the text in an encoded image region.
    async fn extract_text(&self, image: &[u8]) -> Result<String, ServiceError>;
}

/// Runs the `tesseract` command line tool with the English model, feeding
/// the image on stdin and reading text from stdout.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    program: PathBuf,
    language: String,
}

impl TesseractCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            language: "eng".into(),
        }
    }
}

#[async_trait]
impl TextExtractor for TesseractCli {
    async fn extract_text(&self, image: &[u8]) -> Result<String, ServiceError> {
        let mut child = Command::new(&self.program)
            .args(["stdin", "stdout", "-l", self.language.as_str()])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ServiceError::TextExtraction(format!("{}: {e}", self.program.display())))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(image)
                .await
                .map_err(|e| ServiceError::TextExtraction(e.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ServiceError::TextExtraction(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ServiceError::TextExtraction(stderr.trim().to_string()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
