pub mod cli;
pub mod extract;
pub mod manager;
pub mod search;

pub use cli::{handle_command, ScraperCommands};
pub use extract::{extract_page, HttpPageFetcher};
pub use manager::{Providers, ReportManager};
pub use search::{CandidateSearch, Candidates, GoogleSearch};

pub mod prelude {
    pub use super::{Providers, ReportManager};
    pub use nd_core::{DigestReport, Error, Result};
}
