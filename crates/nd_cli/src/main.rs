use clap::Parser;
use nd_core::config::DEFAULT_TARGET_ARTICLES;
use nd_core::Config;
use nd_scrapers::{handle_command, ReportManager, ScraperCommands};
use nd_web::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Durations like `1s`, `500ms`, `2m` or `1m30s`. A bare number means seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Duration must include a number".to_string());
        }
        if let Ok(secs) = s.parse::<u64>() {
            return Ok(HumanDuration(Duration::from_secs(secs)));
        }

        let mut total = Duration::ZERO;
        let mut rest = s;
        while !rest.is_empty() {
            let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
            if digits == 0 {
                return Err(format!("Invalid character in duration: {}", rest));
            }
            let num: u64 = rest[..digits]
                .parse()
                .map_err(|_| "Invalid number in duration".to_string())?;
            rest = &rest[digits..];
            let unit_len = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
            total += match &rest[..unit_len] {
                "ms" => Duration::from_millis(num),
                "s" => Duration::from_secs(num),
                "m" => Duration::from_secs(num * 60),
                "h" => Duration::from_secs(num * 3600),
                unit => return Err(format!("Invalid duration unit: {}", unit)),
            };
            rest = &rest[unit_len..];
        }
        Ok(HumanDuration(total))
    }
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Company news digest with a Hindi audio summary",
    long_about = None
)]
pub struct Cli {
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    google_api_key: Option<String>,
    #[arg(long, env = "SEARCH_ENGINE_ID")]
    search_engine_id: Option<String>,
    #[arg(long, env = "GENERATION_API_KEY", hide_env_values = true)]
    generation_api_key: Option<String>,
    /// Base URL of the OpenAI-compatible generation API
    #[arg(long, env = "GENERATION_BASE_URL")]
    generation_base_url: Option<String>,
    #[arg(long, env = "GENERATION_MODEL")]
    generation_model: Option<String>,
    /// Skip hosted generation and go straight to translation
    #[arg(long)]
    no_generation: bool,
    /// Number of articles to analyze per company
    #[arg(long, default_value_t = DEFAULT_TARGET_ARTICLES)]
    articles: usize,
    /// Compound score beyond which an article counts as positive or negative
    #[arg(long)]
    threshold: Option<f64>,
    /// Where generated MP3 files are written
    #[arg(long, env = "ND_AUDIO_DIR")]
    audio_dir: Option<PathBuf>,
    /// How many generated MP3 files to keep before the oldest are deleted
    #[arg(long, default_value_t = 20)]
    max_audio_files: usize,
    /// Pause between search result pages (e.g. 1s, 500ms)
    #[arg(long, default_value = "1s")]
    page_delay: HumanDuration,
    /// Per-page download timeout
    #[arg(long, default_value = "15s")]
    page_timeout: HumanDuration,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the HTTP service
    Serve {
        #[arg(long, env = "ND_BIND", default_value = "127.0.0.1:8000")]
        bind: SocketAddr,
    },
    /// Build one digest and print it as JSON
    Report {
        company: String,
    },
    #[command(flatten)]
    Scrape(ScraperCommands),
}

impl Cli {
    fn config(&self) -> nd_core::Result<Config> {
        let mut config = Config::new(
            self.google_api_key.clone(),
            self.search_engine_id.clone(),
            self.generation_api_key.clone(),
        )?;
        config.target_articles = self.articles;
        config.search.page_delay = self.page_delay.0;
        config.http.page_timeout = self.page_timeout.0;
        config.generation.enabled = !self.no_generation;
        if let Some(url) = &self.generation_base_url {
            config.generation.base_url = url.clone();
        }
        if let Some(model) = &self.generation_model {
            config.generation.model = model.clone();
        }
        if let Some(threshold) = self.threshold {
            config.analysis.sentiment_threshold = threshold;
        }
        if let Some(dir) = &self.audio_dir {
            config.speech.audio_dir = dir.clone();
        }
        config.speech.max_audio_files = self.max_audio_files;
        config.validate()?;
        Ok(config)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = cli.config()?;
    info!("⚙️ Loaded configuration: {:?}", config.credentials);

    let manager = ReportManager::from_config(&config)?;

    match cli.command {
        Commands::Serve { bind } => {
            let state = AppState {
                manager,
                audio_dir: config.speech.audio_dir.clone(),
            };
            nd_web::serve(state, bind).await?;
        }
        Commands::Report { company } => {
            let report = manager.run(&company).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Scrape(command) => handle_command(command, &manager).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut full = vec!["nd", "--google-api-key", "k", "--search-engine-id", "cx"];
        full.extend_from_slice(&["--generation-api-key", "g"]);
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_human_duration() {
        assert_eq!("2".parse::<HumanDuration>().unwrap().0, Duration::from_secs(2));
        assert_eq!("500ms".parse::<HumanDuration>().unwrap().0, Duration::from_millis(500));
        assert_eq!("1m30s".parse::<HumanDuration>().unwrap().0, Duration::from_secs(90));
        assert!("".parse::<HumanDuration>().is_err());
        assert!("5x".parse::<HumanDuration>().is_err());
        assert!("s".parse::<HumanDuration>().is_err());
    }

    #[test]
    fn test_flags_reach_config() {
        let cli = parse(&[
            "--articles",
            "4",
            "--threshold",
            "0.2",
            "--page-delay",
            "0",
            "--no-generation",
            "report",
            "Tesla",
        ]);
        let config = cli.config().unwrap();
        assert_eq!(config.target_articles, 4);
        assert_eq!(config.analysis.sentiment_threshold, 0.2);
        assert_eq!(config.search.page_delay, Duration::ZERO);
        assert!(!config.generation.enabled);
        assert_eq!(config.speech.max_audio_files, 20);
        assert!(matches!(cli.command, Commands::Report { ref company } if company == "Tesla"));
    }

    #[test]
    fn test_scraper_commands_are_top_level() {
        let cli = parse(&["search", "Tesla"]);
        assert!(matches!(cli.command, Commands::Scrape(ScraperCommands::Search { .. })));

        let cli = parse(&["serve", "--bind", "0.0.0.0:9000"]);
        assert!(matches!(cli.command, Commands::Serve { bind } if bind.port() == 9000));
    }

    #[test]
    fn test_invalid_tunables_fail_validation() {
        let cli = parse(&["--articles", "0", "report", "Tesla"]);
        assert!(cli.config().is_err());

        let cli = parse(&["--max-audio-files", "0", "report", "Tesla"]);
        assert!(cli.config().is_err());
    }
}
