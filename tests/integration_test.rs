use std::sync::Arc;
use std::time::Duration;

use dynread::app::{App, AppEvent, AppMode};
use dynread::engine::{Config, PacerConfig};
use dynread::generation::{GenerateFuture, TextGenerator};
use dynread::input;
use dynread::reading::{Pacer, PacerState};
use dynread::storage::{HistoryStore, JsonHistoryStore, Preferences};
use dynread::ui::{command_to_app_event, parse_command};
use tokio_util::sync::CancellationToken;

struct Echo;

impl TextGenerator for Echo {
    fn generate(&self, prompt: String) -> GenerateFuture {
        Box::pin(async move { Ok(format!("Story for: {prompt}")) })
    }
}

#[tokio::test(start_paused = true)]
async fn file_is_loaded_and_read_to_the_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("story.txt");
    std::fs::write(&path, "Hello world! This is a test.").unwrap();

    let doc = input::text::load(path.to_str().unwrap()).unwrap();
    assert_eq!(doc.text, "Hello world! This is a test.");

    let mut pacer = Pacer::new(CancellationToken::new(), PacerConfig::default());
    pacer.start(&doc.text, 6000).unwrap();
    assert_eq!(pacer.wait_until_finished().await, PacerState::Completed);

    let last = pacer.latest().unwrap();
    assert_eq!(last.word, "test.");
    assert_eq!((last.index, last.total), (5, 6));
}

#[test]
fn config_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "language = \"Portuguese\"\nmargin_lines = 5\n").unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.generation().language, "Portuguese");
    assert_eq!(config.pacer().margin_lines, 5);
    assert_eq!(config.pacer().pause_poll, Duration::from_millis(100));
}

#[tokio::test]
async fn typed_commands_drive_the_app() {
    let dir = tempfile::tempdir().unwrap();
    let prefs_path = dir.path().join("preferences.toml");
    let history_path = dir.path().join("history.json");

    let pacer = Pacer::new(CancellationToken::new(), PacerConfig::default());
    let mut app = App::new(
        pacer,
        Box::new(JsonHistoryStore::new(&history_path)),
        Preferences::load_from(&prefs_path).unwrap(),
        Some(Arc::new(Echo)),
        "English",
    );

    for line in [":wpm 500", ":words 120"] {
        app.handle_event(command_to_app_event(parse_command(line)));
    }
    let stored = Preferences::load_from(&prefs_path).unwrap();
    assert_eq!(stored.words_per_minute(), 500);
    assert_eq!(stored.number_of_words(), 120);

    app.handle_event(command_to_app_event(parse_command("a dragon who cannot fly")));
    for _ in 0..20 {
        tokio::task::yield_now().await;
        app.tick();
        if app.mode() != AppMode::Generating {
            break;
        }
    }
    assert_eq!(app.mode(), AppMode::Reading);

    let records = JsonHistoryStore::new(&history_path).get_all().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].text,
        "Story for: Write a story based on the synopsis ```a dragon who cannot fly``` with 120 words in the language English."
    );

    app.handle_event(AppEvent::Quit);
    assert_eq!(app.mode(), AppMode::Quit);
}
