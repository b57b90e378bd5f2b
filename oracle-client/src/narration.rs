//! Read-aloud of rendered sections.
//!
//! A [`Narrator`] receives each section's title and plain text in display
//! order. The transcript narrator writes the script to disk; the speech
//! narrator synthesizes audio through an OpenAI-compatible endpoint.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use oracle_common::config::{NarrationConfig, NarrationProvider};
use reqwest::Client;

const DEFAULT_SPEECH_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_SPEECH_MODEL: &str = "tts-1";
const DEFAULT_SPEECH_VOICE: &str = "onyx";

/// Reads rendered sections aloud.
#[async_trait]
pub trait Narrator: Send + Sync {
    /// Narrate one section. `index` starts at zero.
    async fn narrate(&self, index: usize, title: &str, text: &str) -> anyhow::Result<()>;

    /// Backend name for logs.
    fn name(&self) -> &str;
}

/// Writes `NN-title.txt` files holding the text that would be spoken.
pub struct TranscriptNarrator {
    dir: PathBuf,
}

impl TranscriptNarrator {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl Narrator for TranscriptNarrator {
    async fn narrate(&self, index: usize, title: &str, text: &str) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(file_name(index, title, "txt"));
        tokio::fs::write(&path, format!("{title}\n\n{text}\n")).await?;
        tracing::debug!(path = %path.display(), "Transcript written");
        Ok(())
    }

    fn name(&self) -> &str {
        "transcript"
    }
}

/// OpenAI-compatible speech synthesis, one mp3 per section.
pub struct SpeechNarrator {
    api_key: String,
    client: Client,
    model: String,
    voice: String,
    base_url: String,
    dir: PathBuf,
}

impl SpeechNarrator {
    pub fn new(api_key: String, dir: impl Into<PathBuf>) -> Self {
        Self {
            api_key,
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .connect_timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
            model: DEFAULT_SPEECH_MODEL.to_string(),
            voice: DEFAULT_SPEECH_VOICE.to_string(),
            base_url: DEFAULT_SPEECH_BASE_URL.to_string(),
            dir: dir.into(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    /// Point at an OpenAI-compatible provider.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn synthesize(&self, text: &str) -> anyhow::Result<Vec<u8>> {
        let body = serde_json::json!({
            "model": self.model,
            "input": text,
            "voice": self.voice,
            "response_format": "mp3"
        });

        let url = format!("{}/v1/audio/speech", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("speech API error ({status}): {error_text}");
        }

        let bytes = response.bytes().await?;
        tracing::info!(
            chars = text.chars().count(),
            bytes = bytes.len(),
            "Speech synthesized"
        );
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl Narrator for SpeechNarrator {
    async fn narrate(&self, index: usize, title: &str, text: &str) -> anyhow::Result<()> {
        let audio = self.synthesize(&format!("{title}. {text}")).await?;
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(file_name(index, title, "mp3"));
        tokio::fs::write(&path, audio).await?;
        tracing::debug!(path = %path.display(), "Audio written");
        Ok(())
    }

    fn name(&self) -> &str {
        "speech"
    }
}

/// Build the narrator selected in configuration.
pub fn create_narrator(config: &NarrationConfig) -> anyhow::Result<Box<dyn Narrator>> {
    let dir = config.resolved_output_dir();
    match config.provider {
        NarrationProvider::Transcript => Ok(Box::new(TranscriptNarrator::new(dir))),
        NarrationProvider::Speech => {
            let api_key = config
                .api_key
                .clone()
                .filter(|k| !k.is_empty())
                .ok_or_else(|| anyhow::anyhow!("narration.api_key is required for speech"))?;

            let mut narrator = SpeechNarrator::new(api_key, dir);
            if let Some(model) = &config.model {
                narrator = narrator.with_model(model);
            }
            if let Some(voice) = &config.voice {
                narrator = narrator.with_voice(voice);
            }
            if let Some(base_url) = &config.base_url {
                narrator = narrator.with_base_url(base_url);
            }
            Ok(Box::new(narrator))
        }
    }
}

fn file_name(index: usize, title: &str, extension: &str) -> String {
    format!("{:02}-{}.{extension}", index + 1, slugify(title))
}

/// Lowercase ASCII slug; accented letters are folded, everything else
/// becomes a single dash.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars().flat_map(char::to_lowercase) {
        let c = fold_accent(c);
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "secao".to_string()
    } else {
        slug.to_string()
    }
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}
