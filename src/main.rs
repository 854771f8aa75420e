use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;

use dynread::app::{App, AppEvent};
use dynread::cli::Cli;
use dynread::engine::Config;
use dynread::generation::{GeminiClient, GeminiConfig, TextGenerator};
use dynread::reading::Pacer;
use dynread::storage::{JsonHistoryStore, Preferences};
use dynread::ui::TuiManager;
use dynread::{logging, paths};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _log_guard = logging::init_tracing(&paths::log_dir());

    let config_path = paths::config_path();
    let config = Config::load_from(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let preferences = Preferences::load_from(paths::preferences_path())
        .context("loading preferences")?;
    let history = JsonHistoryStore::new(paths::history_path());

    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    let enter = runtime.enter();

    let generation = config.generation();
    let generator: Option<Arc<dyn TextGenerator>> =
        match GeminiConfig::from_env(&generation).and_then(GeminiClient::new) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                tracing::warn!(error = %e, "story generation unavailable");
                None
            }
        };

    let owner = CancellationToken::new();
    let pacer = Pacer::new(owner.clone(), config.pacer());
    let mut app = App::new(
        pacer,
        Box::new(history),
        preferences,
        generator,
        generation.language,
    )
    .with_overrides(cli.wpm, cli.words);

    if let Some(path) = cli.file.clone() {
        app.handle_event(AppEvent::LoadFile(path));
    } else if let Some(synopsis) = cli.synopsis() {
        app.handle_event(AppEvent::Generate(synopsis));
    }

    tracing::info!("dynread started");
    let result = TuiManager::new()
        .and_then(|mut tui| tui.run_event_loop(&mut app))
        .context("terminal UI failed");

    owner.cancel();
    drop(app);
    drop(enter);
    runtime.shutdown_timeout(std::time::Duration::from_millis(500));
    tracing::info!("dynread stopped");

    result
}
