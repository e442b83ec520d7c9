use clap::Subcommand;
use nd_core::Result;

use crate::ReportManager;

#[derive(Subcommand, Debug)]
pub enum ScraperCommands {
    /// List the candidate URLs search returns for a company
    Search {
        /// Company name, e.g. Tesla
        company: String,
    },
    /// Download one page and print what the extractor keeps
    Extract {
        url: String,
    },
}

pub async fn handle_command(command: ScraperCommands, manager: &ReportManager) -> Result<()> {
    match command {
        ScraperCommands::Search { company } => {
            let urls = manager.candidates(&company).await?;
            println!("Found {} candidates", urls.len());
            for (i, url) in urls.iter().enumerate() {
                println!("{:>3}. {}", i + 1, url);
            }
        }
        ScraperCommands::Extract { url } => match manager.extract_url(&url).await {
            Ok(page) => {
                println!("📰 {}", page.title);
                println!("{}", page.raw_text);
            }
            Err(e) if e.is_article_local() => eprintln!("⏭️ {} would be skipped: {}", url, e),
            Err(e) => return Err(e),
        },
    }
    Ok(())
}
