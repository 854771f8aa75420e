//! Timed word-reveal scheduler.
//!
//! A [`Pacer`] turns a block of text into a sequence of [`Emission`]s, one per
//! word, spaced `60_000 / wpm` milliseconds apart. Each session runs as a
//! single tokio task. Consumers read the latest emission and the session
//! state from `watch` channels, so a slow consumer skips frames instead of
//! building a backlog.
//!
//! Cancellation is cooperative: every session owns a child of the owner's
//! [`CancellationToken`], checked before each emission and raced against each
//! wait. Starting a new session cancels the previous one, and a session id
//! checked under the channel lock keeps a superseded task from publishing.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::engine::config::PacerConfig;
use crate::engine::error::ReaderError;
use crate::reading::buffer::DisplayBuffer;
use crate::reading::state::ReadingSession;

/// Shared pause switch. The UI writes it, the session task reads it at each
/// iteration boundary.
#[derive(Debug, Clone, Default)]
pub struct PauseFlag(Arc<AtomicBool>);

impl PauseFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, paused: bool) {
        self.0.store(paused, Ordering::Release);
    }

    pub fn pause(&self) {
        self.set(true);
    }

    pub fn resume(&self) {
        self.set(false);
    }

    /// Flips the flag and returns the new value.
    pub fn toggle(&self) -> bool {
        !self.0.fetch_xor(true, Ordering::AcqRel)
    }

    pub fn is_paused(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacerState {
    Idle,
    Running,
    Paused,
    Completed,
    Cancelled,
}

impl PacerState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PacerState::Completed | PacerState::Cancelled)
    }

    pub fn is_active(self) -> bool {
        matches!(self, PacerState::Running | PacerState::Paused)
    }
}

/// One reveal step: the word, the rebuilt display buffer and, through the
/// buffer, the offset of the emphasized word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emission {
    pub session: u64,
    pub index: usize,
    pub total: usize,
    pub word: String,
    pub buffer: DisplayBuffer,
}

impl Emission {
    pub fn emphasis_offset(&self) -> usize {
        self.buffer.emphasis_offset()
    }
}

struct ActiveSession {
    id: u64,
    cancel: CancellationToken,
}

pub struct Pacer {
    config: PacerConfig,
    owner: CancellationToken,
    pause: PauseFlag,
    next_id: u64,
    /// Id of the session allowed to publish; only changed under the emission lock.
    current: Arc<AtomicU64>,
    active: Option<ActiveSession>,
    emission_tx: watch::Sender<Option<Emission>>,
    state_tx: watch::Sender<PacerState>,
}

impl Pacer {
    /// Creates an idle pacer. Cancelling `owner` tears down any running
    /// session; sessions started afterwards end as `Cancelled` immediately.
    pub fn new(owner: CancellationToken, config: PacerConfig) -> Self {
        let (emission_tx, _) = watch::channel(None);
        let (state_tx, _) = watch::channel(PacerState::Idle);
        Self {
            config,
            owner,
            pause: PauseFlag::new(),
            next_id: 0,
            current: Arc::new(AtomicU64::new(0)),
            active: None,
            emission_tx,
            state_tx,
        }
    }

    pub fn pause_flag(&self) -> PauseFlag {
        self.pause.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Emission>> {
        self.emission_tx.subscribe()
    }

    pub fn state_receiver(&self) -> watch::Receiver<PacerState> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> PacerState {
        *self.state_tx.borrow()
    }

    pub fn latest(&self) -> Option<Emission> {
        self.emission_tx.borrow().clone()
    }

    /// Starts a new session, cancelling the running one.
    ///
    /// Must be called from within a tokio runtime. Returns the new session id.
    pub fn start(&mut self, text: &str, words_per_minute: u32) -> Result<u64, ReaderError> {
        let session = ReadingSession::new(text, words_per_minute)?;

        self.stop_active();
        self.next_id += 1;
        let id = self.next_id;
        let current = Arc::clone(&self.current);
        self.emission_tx.send_modify(|slot| {
            current.store(id, Ordering::SeqCst);
            *slot = None;
        });

        if session.is_finished() {
            tracing::debug!(session = id, "empty text, nothing to reveal");
            self.state_tx.send_replace(PacerState::Completed);
            return Ok(id);
        }

        tracing::info!(
            session = id,
            words = session.words.len(),
            wpm = words_per_minute,
            delay_ms = session.delay_ms(),
            "starting reading session"
        );

        let cancel = self.owner.child_token();
        self.state_tx.send_replace(PacerState::Running);
        let task = SessionTask {
            id,
            session,
            margin_lines: self.config.margin_lines,
            pause_poll: self.config.pause_poll,
            pause: self.pause.clone(),
            cancel: cancel.clone(),
            current: Arc::clone(&self.current),
            emission_tx: self.emission_tx.clone(),
            state_tx: self.state_tx.clone(),
        };
        tokio::spawn(task.run());

        self.active = Some(ActiveSession { id, cancel });
        Ok(id)
    }

    /// Stops the running session. No emission is published after this
    /// returns. Calling it again, or with nothing running, is a no-op.
    pub fn cancel(&mut self) {
        if self.stop_active() {
            self.state_tx.send_if_modified(|state| {
                if state.is_active() {
                    *state = PacerState::Cancelled;
                    true
                } else {
                    false
                }
            });
        }
    }

    /// Resolves once the current session is completed or cancelled.
    pub async fn wait_until_finished(&self) -> PacerState {
        let mut rx = self.state_tx.subscribe();
        let state = match rx.wait_for(|state| !state.is_active()).await {
            Ok(state) => *state,
            Err(_) => self.state(),
        };
        state
    }

    fn stop_active(&mut self) -> bool {
        let Some(active) = self.active.take() else {
            return false;
        };
        active.cancel.cancel();
        // Revoke publishing rights under the channel lock without notifying.
        let current = Arc::clone(&self.current);
        self.emission_tx.send_if_modified(|_| {
            current.store(0, Ordering::SeqCst);
            false
        });
        tracing::debug!(session = active.id, "reading session cancelled");
        true
    }
}

impl Drop for Pacer {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
        }
    }
}

struct SessionTask {
    id: u64,
    session: ReadingSession,
    margin_lines: usize,
    pause_poll: Duration,
    pause: PauseFlag,
    cancel: CancellationToken,
    current: Arc<AtomicU64>,
    emission_tx: watch::Sender<Option<Emission>>,
    state_tx: watch::Sender<PacerState>,
}

impl SessionTask {
    async fn run(mut self) {
        let outcome = self.reveal_all().await;
        self.publish_state(outcome);
        tracing::debug!(session = self.id, state = ?outcome, "reading session ended");
    }

    async fn reveal_all(&mut self) -> PacerState {
        let delay = Duration::from_millis(self.session.delay_ms());

        while !self.session.is_finished() {
            if self.pause.is_paused() && !self.wait_while_paused().await {
                return PacerState::Cancelled;
            }
            if self.cancel.is_cancelled() {
                return PacerState::Cancelled;
            }

            let index = self.session.current_index;
            let emission = Emission {
                session: self.id,
                index,
                total: self.session.words.len(),
                word: self.session.words[index].clone(),
                buffer: DisplayBuffer::build(&self.session.words, index, self.margin_lines),
            };
            if !self.publish(emission) {
                return PacerState::Cancelled;
            }

            if delay.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => return PacerState::Cancelled,
                    _ = tokio::time::sleep(delay) => {}
                }
            }
            self.session.advance();
        }

        PacerState::Completed
    }

    /// Polls the pause flag until it clears. Returns false if cancelled meanwhile.
    async fn wait_while_paused(&mut self) -> bool {
        self.session.paused = true;
        self.publish_state(PacerState::Paused);

        while self.pause.is_paused() {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return false,
                _ = tokio::time::sleep(self.pause_poll) => {}
            }
        }

        self.session.paused = false;
        self.publish_state(PacerState::Running);
        true
    }

    fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.id
    }

    fn publish(&self, emission: Emission) -> bool {
        let mut emission = Some(emission);
        self.emission_tx.send_if_modified(|slot| {
            if self.cancel.is_cancelled() || !self.is_current() {
                return false;
            }
            *slot = emission.take();
            true
        })
    }

    fn publish_state(&self, state: PacerState) {
        self.state_tx.send_if_modified(|slot| {
            if !self.is_current() || *slot == state {
                return false;
            }
            *slot = state;
            true
        });
    }
}
