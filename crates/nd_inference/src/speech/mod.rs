use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use async_trait::async_trait;
use nd_core::{Config, Error, Result, Synthesizer};
use reqwest::Client;
use tracing::{debug, info, warn};
use uuid::Uuid;

const SENTENCE_ENDS: [char; 4] = ['।', '.', '!', '?'];

/// Speech through the public Google Translate TTS endpoint, which caps each
/// request at a short text; longer narratives are sent in chunks and the MP3
/// frames are concatenated.
pub struct GoogleTtsSynthesizer {
    client: Client,
    endpoint: String,
    audio_dir: PathBuf,
    chunk_chars: usize,
    max_audio_files: usize,
}

impl fmt::Debug for GoogleTtsSynthesizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleTtsSynthesizer")
            .field("endpoint", &self.endpoint)
            .field("audio_dir", &self.audio_dir)
            .field("chunk_chars", &self.chunk_chars)
            .field("max_audio_files", &self.max_audio_files)
            .finish()
    }
}

impl GoogleTtsSynthesizer {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.http.provider_timeout)
            .user_agent(config.http.user_agent.as_str())
            .build()?;
        Ok(Self {
            client,
            endpoint: config.speech.endpoint.clone(),
            audio_dir: config.speech.audio_dir.clone(),
            chunk_chars: config.speech.chunk_chars,
            max_audio_files: config.speech.max_audio_files,
        })
    }

    /// Writes `audio` as a fresh `<uuid>.mp3` and trims the directory to the newest files.
    async fn store(&self, audio: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.audio_dir).await?;
        let path = self.audio_dir.join(format!("{}.mp3", Uuid::new_v4()));
        tokio::fs::write(&path, audio).await?;
        info!(path = %path.display(), bytes = audio.len(), "🔊 Audio written");

        match prune_audio_dir(&self.audio_dir, self.max_audio_files, &path).await {
            Ok(0) => {}
            Ok(removed) => debug!(removed, "Pruned old audio files"),
            Err(e) => warn!(
                error = %e,
                dir = %self.audio_dir.display(),
                "Could not prune audio directory"
            ),
        }
        Ok(path)
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        idx: usize,
        total: usize,
        lang: &str,
    ) -> Result<Vec<u8>> {
        let total = total.to_string();
        let idx = idx.to_string();
        let textlen = chunk.chars().count().to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("q", chunk),
                ("tl", lang),
                ("client", "tw-ob"),
                ("total", total.as_str()),
                ("idx", idx.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Tts(format!("provider returned {} for chunk {}", status, idx)));
        }
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(Error::Tts(format!("provider returned no audio for chunk {}", idx)));
        }
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl Synthesizer for GoogleTtsSynthesizer {
    fn name(&self) -> &str {
        "google-tts"
    }

    async fn synthesize(&self, text: &str, lang: &str) -> Result<PathBuf> {
        let chunks = split_for_tts(text, self.chunk_chars);
        if chunks.is_empty() {
            return Err(Error::Tts("nothing to speak".to_string()));
        }

        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            debug!(idx, total = chunks.len(), "Requesting speech chunk");
            audio.extend(self.fetch_chunk(chunk, idx, chunks.len(), lang).await?);
        }

        self.store(&audio).await
    }
}

/// Deletes the oldest `.mp3` files in `dir` until at most `keep` remain.
/// `newest` is never deleted and counts towards `keep`.
pub async fn prune_audio_dir(dir: &Path, keep: usize, newest: &Path) -> Result<usize> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut older = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path == newest || path.extension().and_then(|e| e.to_str()) != Some("mp3") {
            continue;
        }
        let meta = entry.metadata().await?;
        if !meta.is_file() {
            continue;
        }
        older.push((meta.modified().unwrap_or(SystemTime::UNIX_EPOCH), path));
    }
    older.sort_by(|a, b| b.0.cmp(&a.0));

    let mut removed = 0;
    for (_, path) in older.into_iter().skip(keep.saturating_sub(1)) {
        tokio::fs::remove_file(&path).await?;
        removed += 1;
    }
    Ok(removed)
}

pub fn create_synthesizer(config: &Config) -> Result<Arc<dyn Synthesizer>> {
    Ok(Arc::new(GoogleTtsSynthesizer::new(config)?))
}

/// Splits `text` into pieces of at most `max_chars` characters, preferring
/// sentence boundaries, then word boundaries.
pub fn split_for_tts(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();

    for sentence in sentences(text) {
        for piece in fit(&sentence, max_chars) {
            let needed = piece.chars().count() + usize::from(!current.is_empty());
            if current.chars().count() + needed > max_chars && !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&piece);
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        current.push(c);
        if SENTENCE_ENDS.contains(&c) {
            push_trimmed(&mut out, &current);
            current.clear();
        }
    }
    push_trimmed(&mut out, &current);
    out
}

fn push_trimmed(out: &mut Vec<String>, s: &str) {
    let s = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if !s.is_empty() {
        out.push(s);
    }
}

/// Breaks one sentence into word-aligned pieces no longer than `max_chars`.
fn fit(sentence: &str, max_chars: usize) -> Vec<String> {
    if sentence.chars().count() <= max_chars {
        return vec![sentence.to_string()];
    }
    let mut pieces = Vec::new();
    let mut current = String::new();
    for word in sentence.split_whitespace() {
        let word_len = word.chars().count();
        if word_len > max_chars {
            if !current.is_empty() {
                pieces.push(std::mem::take(&mut current));
            }
            let chars: Vec<char> = word.chars().collect();
            pieces.extend(chars.chunks(max_chars).map(|c| c.iter().collect::<String>()));
            continue;
        }
        let needed = word_len + usize::from(!current.is_empty());
        if current.chars().count() + needed > max_chars {
            pieces.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_one_chunk() {
        assert_eq!(
            split_for_tts("टेस्ला की खबरें अच्छी हैं।", 100),
            vec!["टेस्ला की खबरें अच्छी हैं।"]
        );
    }

    #[test]
    fn test_empty_text_has_no_chunks() {
        assert!(split_for_tts("   ", 100).is_empty());
    }

    #[test]
    fn test_chunks_respect_limit_and_keep_words() {
        let text = "पहला वाक्य यहाँ है। दूसरा वाक्य थोड़ा लंबा है और इसमें कई शब्द हैं। तीसरा!";
        let chunks = split_for_tts(text, 20);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 20, "{:?} too long", chunk);
        }
        let rejoined = chunks.join(" ");
        let original: Vec<&str> = text.split_whitespace().collect();
        let after: Vec<&str> = rejoined.split_whitespace().collect();
        assert_eq!(original, after);
    }

    #[test]
    fn test_sentences_are_packed_together() {
        let chunks = split_for_tts("One. Two. Three.", 10);
        assert_eq!(chunks, vec!["One. Two.", "Three."]);
    }

    #[test]
    fn test_overlong_word_is_cut() {
        let chunks = split_for_tts("abcdefghij", 4);
        assert_eq!(chunks, vec!["abcd", "efgh", "ij"]);
    }

    fn synthesizer(dir: &Path, keep: usize) -> GoogleTtsSynthesizer {
        let mut config =
            Config::new(Some("k".into()), Some("cx".into()), Some("g".into())).unwrap();
        config.speech.audio_dir = dir.to_path_buf();
        config.speech.max_audio_files = keep;
        GoogleTtsSynthesizer::new(&config).unwrap()
    }

    fn mp3_count(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("mp3"))
            .count()
    }

    #[tokio::test]
    async fn test_repeated_writes_keep_directory_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let tts = synthesizer(dir.path(), 2);
        let mut last = PathBuf::new();
        for _ in 0..5 {
            last = tts.store(b"ID3").await.unwrap();
        }
        assert_eq!(mp3_count(dir.path()), 2);
        assert!(last.exists());
    }

    #[tokio::test]
    async fn test_prune_removes_oldest_and_leaves_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let now = SystemTime::now();
        for (i, name) in ["a.mp3", "b.mp3", "c.mp3"].iter().enumerate() {
            let path = dir.path().join(name);
            let file = std::fs::File::create(&path).unwrap();
            file.set_modified(now - std::time::Duration::from_secs(100 - i as u64 * 10)).unwrap();
        }
        std::fs::write(dir.path().join("notes.txt"), "keep").unwrap();
        let newest = dir.path().join("d.mp3");
        std::fs::write(&newest, b"ID3").unwrap();

        let removed = prune_audio_dir(dir.path(), 2, &newest).await.unwrap();
        assert_eq!(removed, 2);
        assert!(newest.exists());
        assert!(dir.path().join("c.mp3").exists());
        assert!(!dir.path().join("a.mp3").exists());
        assert!(!dir.path().join("b.mp3").exists());
        assert!(dir.path().join("notes.txt").exists());
    }

    #[tokio::test]
    async fn test_synthesize_rejects_empty_text() {
        let dir = tempfile::tempdir().unwrap();
        let tts = synthesizer(dir.path(), 20);
        let err = tts.synthesize("  ", "hi").await.unwrap_err();
        assert!(matches!(err, Error::Tts(_)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
