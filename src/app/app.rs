use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::event::AppEvent;
use super::mode::AppMode;
use super::render_state::{RenderState, Status};
use crate::generation::{generate_story, GenerationError, StoryRequest, TextGenerator};
use crate::input::{self, LoadError, LoadedDocument};
use crate::reading::{Pacer, PacerState, PauseFlag};
use crate::storage::{group_by_day, HistoryItem, HistoryRecord, HistoryStore, Preferences};

const HELP: &[&str] = &[
    "<synopsis>     generate a story and read it",
    "@<path>        read a text file",
    "@@             read the clipboard",
    ":wpm <n>       set words per minute",
    ":words <n>     set the story length in words",
    ":ls            list history",
    ":r <id>        read a history entry again",
    ":d <id>        delete a history entry",
    ":clear         delete all history",
    ":q             quit",
    "While reading: space pauses, r restarts, q or Esc stops",
];

struct PendingGeneration {
    request: StoryRequest,
    rx: oneshot::Receiver<Result<String, GenerationError>>,
    handle: JoinHandle<()>,
}

pub struct App {
    mode: AppMode,
    pacer: Pacer,
    pause: PauseFlag,
    history: Box<dyn HistoryStore>,
    preferences: Preferences,
    generator: Option<Arc<dyn TextGenerator>>,
    language: String,
    pending: Option<PendingGeneration>,
    current_text: Option<String>,
    wpm_override: Option<u32>,
    words_override: Option<u32>,
    status: Option<Status>,
    panel: Vec<String>,
}

impl App {
    /// `generator` is `None` when no provider is configured; generating then
    /// reports an error instead of starting a request.
    pub fn new(
        pacer: Pacer,
        history: Box<dyn HistoryStore>,
        preferences: Preferences,
        generator: Option<Arc<dyn TextGenerator>>,
        language: impl Into<String>,
    ) -> Self {
        let pause = pacer.pause_flag();
        Self {
            mode: AppMode::Command,
            pacer,
            pause,
            history,
            preferences,
            generator,
            language: language.into(),
            pending: None,
            current_text: None,
            wpm_override: None,
            words_override: None,
            status: None,
            panel: Vec::new(),
        }
    }

    /// Values that apply to this run only and are not written to preferences.
    pub fn with_overrides(mut self, wpm: Option<u32>, words: Option<u32>) -> Self {
        self.wpm_override = wpm;
        self.words_override = words;
        self
    }

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    pub fn get_wpm(&self) -> u32 {
        self.wpm_override
            .unwrap_or_else(|| self.preferences.words_per_minute())
    }

    pub fn number_of_words(&self) -> u32 {
        self.words_override
            .unwrap_or_else(|| self.preferences.number_of_words())
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn panel(&self) -> &[String] {
        &self.panel
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Generate(synopsis) => self.generate(synopsis),
            AppEvent::LoadFile(path) => self.load_document(input::text::load(&path)),
            AppEvent::LoadClipboard => self.load_document(input::clipboard::load()),
            AppEvent::SetWordsPerMinute(wpm) => match self.preferences.set_words_per_minute(wpm) {
                Ok(()) => {
                    self.wpm_override = None;
                    self.info(format!("Words per minute set to {wpm}"));
                }
                Err(e) => self.error(e.to_string()),
            },
            AppEvent::SetNumberOfWords(words) => {
                match self.preferences.set_number_of_words(words) {
                    Ok(()) => {
                        self.words_override = None;
                        self.info(format!("Stories will have about {words} words"));
                    }
                    Err(e) => self.error(e.to_string()),
                }
            }
            AppEvent::ShowHistory => self.show_history(),
            AppEvent::ReadHistory(id) => match self.history.find(id) {
                Ok(Some(record)) => self.start_reading(&record.text),
                Ok(None) => self.error(format!("No history entry #{id}")),
                Err(e) => self.error(e.to_string()),
            },
            AppEvent::DeleteHistory(id) => self.delete_history(id),
            AppEvent::ClearHistory => match self.history.delete_all() {
                Ok(()) => {
                    self.panel.clear();
                    self.info("History cleared");
                }
                Err(e) => self.error(e.to_string()),
            },
            AppEvent::Quit => self.quit(),
            AppEvent::Help => {
                self.panel = HELP.iter().map(|line| line.to_string()).collect();
                self.status = None;
            }
            AppEvent::InvalidCommand(input) if input.is_empty() => {
                self.error("Type a synopsis, or :h for help")
            }
            AppEvent::InvalidCommand(input) => self.error(format!("Unknown command: {input}")),
            AppEvent::None => {}
        }
    }

    /// Keys while a text is on screen.
    pub fn handle_keypress(&mut self, c: char) {
        if !self.mode.is_reading() {
            return;
        }
        match c {
            ' ' => self.toggle_pause(),
            'r' => self.restart_reading(),
            'q' => self.stop_reading(),
            _ => {}
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.mode {
            AppMode::Reading => {
                self.pause.pause();
                self.mode = AppMode::Paused;
            }
            AppMode::Paused => {
                self.pause.resume();
                self.mode = AppMode::Reading;
            }
            _ => {}
        }
    }

    pub fn start_reading(&mut self, text: &str) {
        self.pause.resume();
        match self.pacer.start(text, self.get_wpm()) {
            Ok(_) => {
                self.current_text = Some(text.to_string());
                self.mode = AppMode::Reading;
                self.status = None;
                self.panel.clear();
            }
            Err(e) => self.error(e.to_string()),
        }
    }

    pub fn restart_reading(&mut self) {
        if let Some(text) = self.current_text.clone() {
            self.start_reading(&text);
        }
    }

    pub fn stop_reading(&mut self) {
        self.pacer.cancel();
        self.pause.resume();
        if self.mode.is_reading() {
            self.mode = AppMode::Command;
        }
    }

    /// Polls background work. Called once per UI frame.
    pub fn tick(&mut self) {
        self.poll_generation();

        let state = self.pacer.state();
        if self.mode.is_reading() && state.is_terminal() {
            self.mode = AppMode::Command;
            if state == PacerState::Completed {
                let total = self.pacer.latest().map_or(0, |e| e.total);
                self.info(format!("Finished reading {total} words"));
            }
        }
    }

    pub fn get_render_state(&self) -> RenderState {
        let emission = if self.mode.is_reading() {
            self.pacer.latest()
        } else {
            None
        };
        RenderState {
            mode: self.mode,
            progress: RenderState::progress_from(emission.as_ref()),
            emission,
            words_per_minute: self.get_wpm(),
            number_of_words: self.number_of_words(),
            status: self.status.clone(),
            panel: self.panel.clone(),
        }
    }

    fn generate(&mut self, synopsis: String) {
        if self.pending.is_some() {
            self.error("A story is already being generated");
            return;
        }
        let Some(generator) = self.generator.clone() else {
            self.error(GenerationError::MissingApiKey.to_string());
            return;
        };
        if synopsis.trim().is_empty() {
            self.error(GenerationError::EmptySynopsis.to_string());
            return;
        }

        self.stop_reading();
        let request = StoryRequest::new(synopsis, self.number_of_words(), self.language.clone());
        let (tx, rx) = oneshot::channel();
        let task_request = request.clone();
        let handle = tokio::spawn(async move {
            let result = generate_story(generator.as_ref(), &task_request).await;
            let _ = tx.send(result);
        });

        self.pending = Some(PendingGeneration {
            request,
            rx,
            handle,
        });
        self.mode = AppMode::Generating;
        self.panel.clear();
        self.info("Generating story...");
    }

    fn poll_generation(&mut self) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        let result = match pending.rx.try_recv() {
            Ok(result) => result,
            Err(oneshot::error::TryRecvError::Empty) => return,
            Err(oneshot::error::TryRecvError::Closed) => Err(GenerationError::NoText),
        };
        let Some(pending) = self.pending.take() else {
            return;
        };
        if self.mode == AppMode::Generating {
            self.mode = AppMode::Command;
        }

        match result {
            Ok(text) => {
                let request = pending.request;
                let record = HistoryRecord::new(
                    request.synopsis,
                    text.clone(),
                    request.number_of_words,
                    request.language,
                );
                if let Err(e) = self.history.insert(record) {
                    tracing::warn!(error = %e, "could not store generated story");
                }
                self.start_reading(&text);
            }
            Err(e) => self.error(format!("Could not generate a story: {e}")),
        }
    }

    fn load_document(&mut self, loaded: Result<LoadedDocument, LoadError>) {
        match loaded {
            Ok(doc) => {
                tracing::info!(source = %doc.source, "reading loaded document");
                self.start_reading(&doc.text);
            }
            Err(e) => self.error(e.to_string()),
        }
    }

    fn show_history(&mut self) {
        let records = match self.history.get_all() {
            Ok(records) => records,
            Err(e) => return self.error(e.to_string()),
        };
        if records.is_empty() {
            self.panel.clear();
            self.info("History is empty");
            return;
        }

        self.panel = group_by_day(&records)
            .into_iter()
            .map(|item| match item {
                HistoryItem::Header(day) => day,
                HistoryItem::Record(record) => format!(
                    "  #{:<4} {} ({} words, {})",
                    record.id,
                    summarize(&record.synopsis, 48),
                    record.number_of_words,
                    record.language
                ),
            })
            .collect();
        self.status = None;
    }

    fn delete_history(&mut self, id: u64) {
        let record = match self.history.find(id) {
            Ok(Some(record)) => record,
            Ok(None) => return self.error(format!("No history entry #{id}")),
            Err(e) => return self.error(e.to_string()),
        };
        match self.history.delete(&record) {
            Ok(_) => {
                self.panel.clear();
                self.info(format!("Deleted history entry #{id}"));
            }
            Err(e) => self.error(e.to_string()),
        }
    }

    fn quit(&mut self) {
        self.pacer.cancel();
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();
        }
        self.mode = AppMode::Quit;
    }

    fn info(&mut self, text: impl Into<String>) {
        self.status = Some(Status::Info(text.into()));
    }

    fn error(&mut self, text: impl Into<String>) {
        let text = text.into();
        tracing::warn!(%text, "command failed");
        self.status = Some(Status::Error(text));
    }
}

fn summarize(text: &str, max_chars: usize) -> String {
    let line = text.lines().next().unwrap_or_default().trim();
    if line.chars().count() <= max_chars {
        return line.to_string();
    }
    let cut: String = line.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_short() {
        assert_eq!(summarize("a dragon", 48), "a dragon");
    }

    #[test]
    fn test_summarize_long() {
        assert_eq!(summarize("abcdefghij", 6), "abc...");
    }

    #[test]
    fn test_summarize_first_line_only() {
        assert_eq!(summarize("first\nsecond", 48), "first");
    }
}
