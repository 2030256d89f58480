mod cli;

use std::path::Path;
use std::sync::Arc;

use clap::{CommandFactory, Parser};

use cli::{Cli, Commands};
use deskboard_core::AppConfig;
use deskboard_domain::BucketFilter;
use deskboard_remote::{BoardSource, RestBoardSource};
use deskboard_sync::SyncEngine;
use deskboard_tui::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("DESKBOARD_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .init();
    }

    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        clap_complete::generate(
            *shell,
            &mut Cli::command(),
            "deskboard",
            &mut std::io::stdout(),
        );
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(Path::new(path)),
        None => AppConfig::load(),
    };

    let source = build_source(&cli, &config)?;
    let filter = match config.effective_persona(cli.persona.as_deref()) {
        Some(persona) => BucketFilter::from_titles(&persona.buckets),
        None => {
            if let Some(name) = &cli.persona {
                anyhow::bail!("unknown persona '{}'", name);
            }
            BucketFilter::all()
        }
    };

    match cli.command {
        Some(Commands::Snapshot) => {
            let snapshot = source.fetch_snapshot().await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Some(Commands::Completions { .. }) => unreachable!("handled above"),
        None => {
            let engine = SyncEngine::new(source, filter);
            let mut app = App::new(engine);
            app.run().await?;
        }
    }

    Ok(())
}

fn build_source(cli: &Cli, config: &AppConfig) -> anyhow::Result<Arc<dyn BoardSource>> {
    let board = cli
        .board
        .clone()
        .or_else(|| config.board.clone())
        .ok_or_else(|| anyhow::anyhow!("no board configured (--board or config file)"))?;
    let key = config
        .effective_api_key()
        .ok_or_else(|| anyhow::anyhow!("no API key (DESKBOARD_API_KEY or config file)"))?;
    let token = config
        .effective_api_token()
        .ok_or_else(|| anyhow::anyhow!("no API token (DESKBOARD_API_TOKEN or config file)"))?;

    let source = RestBoardSource::new(&config.api_base, board, key, token)?;
    Ok(Arc::new(source))
}
