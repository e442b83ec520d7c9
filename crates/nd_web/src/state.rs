use std::path::PathBuf;

use nd_scrapers::ReportManager;

pub struct AppState {
    pub manager: ReportManager,
    /// Directory the synthesizer writes MP3 files into, served under `/api/audio`.
    pub audio_dir: PathBuf,
}
