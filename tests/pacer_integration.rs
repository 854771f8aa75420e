use std::time::Duration;

use dynread::engine::PacerConfig;
use dynread::reading::{Emission, Pacer, PacerState};
use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

fn pacer() -> Pacer {
    Pacer::new(CancellationToken::new(), PacerConfig::default())
}

/// Waits for the next published emission, skipping the reset to `None`.
async fn next_emission(rx: &mut watch::Receiver<Option<Emission>>) -> Emission {
    loop {
        rx.changed().await.unwrap();
        if let Some(emission) = rx.borrow_and_update().clone() {
            return emission;
        }
    }
}

#[tokio::test(start_paused = true)]
async fn emissions_are_spaced_by_the_word_delay() {
    let mut pacer = pacer();
    let mut rx = pacer.subscribe();

    let started = Instant::now();
    pacer.start("a b c", 60).unwrap();

    let mut seen = Vec::new();
    for _ in 0..3 {
        let emission = next_emission(&mut rx).await;
        seen.push((emission.index, emission.word, started.elapsed()));
    }

    let indices: Vec<usize> = seen.iter().map(|(i, _, _)| *i).collect();
    let words: Vec<&str> = seen.iter().map(|(_, w, _)| w.as_str()).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(words, vec!["a", "b", "c"]);

    assert!(seen[0].2 < Duration::from_millis(10));
    for pair in seen.windows(2) {
        let gap = pair[1].2 - pair[0].2;
        assert!(gap >= Duration::from_millis(1000), "gap was {gap:?}");
        assert!(gap < Duration::from_millis(1010), "gap was {gap:?}");
    }

    assert_eq!(pacer.wait_until_finished().await, PacerState::Completed);
}

#[tokio::test(start_paused = true)]
async fn pause_delays_the_next_word_without_skipping_it() {
    let mut pacer = pacer();
    let pause = pacer.pause_flag();
    let mut rx = pacer.subscribe();

    let mut states = pacer.state_receiver();

    pause.pause();
    let started = Instant::now();
    pacer.start("a b c", 60).unwrap();
    states
        .wait_for(|state| *state == PacerState::Paused)
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(350)).await;
    assert_eq!(pacer.state(), PacerState::Paused);
    assert!(pacer.latest().is_none());
    pause.resume();

    let first = next_emission(&mut rx).await;
    assert_eq!(first.index, 0);
    assert_eq!(first.word, "a");
    assert!(started.elapsed() >= Duration::from_millis(350));
    assert_eq!(pacer.state(), PacerState::Running);
}

#[tokio::test(start_paused = true)]
async fn pause_mid_text_holds_the_current_word() {
    let mut pacer = pacer();
    let pause = pacer.pause_flag();
    let mut rx = pacer.subscribe();

    pacer.start("a b c", 60).unwrap();
    assert_eq!(next_emission(&mut rx).await.word, "a");

    pause.pause();
    tokio::time::sleep(Duration::from_secs(5)).await;
    // "b" is due at 1s but the pause flag is read before it is published
    assert_eq!(pacer.latest().map(|e| e.word), Some("a".to_string()));

    let resumed = Instant::now();
    pause.resume();
    let second = next_emission(&mut rx).await;
    assert_eq!(second.word, "b");
    assert!(resumed.elapsed() < Duration::from_millis(110));
}

#[tokio::test(start_paused = true)]
async fn restart_leaves_no_stale_emissions() {
    let mut pacer = pacer();
    let first_id = pacer.start("one two three four", 60).unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(pacer.latest().map(|e| e.session), Some(first_id));

    let mut rx = pacer.subscribe();
    let second_id = pacer.start("x y", 60).unwrap();
    assert_ne!(first_id, second_id);

    let mut words = Vec::new();
    for _ in 0..2 {
        let emission = next_emission(&mut rx).await;
        assert_eq!(emission.session, second_id);
        words.push(emission.word);
    }
    assert_eq!(words, vec!["x", "y"]);

    assert_eq!(pacer.wait_until_finished().await, PacerState::Completed);
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(!rx.has_changed().unwrap());
    assert_eq!(pacer.latest().map(|e| e.session), Some(second_id));
}

#[tokio::test(start_paused = true)]
async fn empty_text_completes_without_emitting() {
    let mut pacer = pacer();
    let mut rx = pacer.subscribe();

    pacer.start(" \n\t ", 300).unwrap();
    assert_eq!(pacer.state(), PacerState::Completed);
    assert_eq!(pacer.wait_until_finished().await, PacerState::Completed);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(rx.borrow_and_update().is_none());
}

#[tokio::test(start_paused = true)]
async fn emphasis_offset_points_at_each_word() {
    let margin = PacerConfig::default().margin_lines;
    let text = "The quick brown fox jumps over the lazy dog";
    let words: Vec<&str> = text.split_whitespace().collect();

    let mut pacer = pacer();
    let mut rx = pacer.subscribe();
    pacer.start(text, 600).unwrap();

    for (k, word) in words.iter().enumerate() {
        let emission = next_emission(&mut rx).await;
        assert_eq!(emission.index, k);

        let expected = margin + words[..k].iter().map(|w| w.len() + 1).sum::<usize>();
        assert_eq!(emission.emphasis_offset(), expected);
        assert!(emission.buffer.text[expected..].starts_with(word));
        assert_eq!(emission.buffer.emphasized(), *word);
    }
}

#[tokio::test(start_paused = true)]
async fn cancelling_the_owner_stops_the_session() {
    let owner = CancellationToken::new();
    let mut pacer = Pacer::new(owner.clone(), PacerConfig::default());
    pacer.start("a b c d e", 60).unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    owner.cancel();
    assert_eq!(pacer.wait_until_finished().await, PacerState::Cancelled);
    let last = pacer.latest().map(|e| e.index);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(pacer.latest().map(|e| e.index), last);
}

#[tokio::test(start_paused = true)]
async fn pause_during_a_wait_does_not_stretch_that_wait() {
    let mut pacer = pacer();
    let pause = pacer.pause_flag();
    let mut rx = pacer.subscribe();

    let started = Instant::now();
    pacer.start("a b c", 60).unwrap();
    assert_eq!(next_emission(&mut rx).await.word, "a");

    // Paused and resumed inside the 1s wait after "a"
    tokio::time::sleep(Duration::from_millis(100)).await;
    pause.pause();
    tokio::time::sleep(Duration::from_millis(500)).await;
    pause.resume();

    let second = next_emission(&mut rx).await;
    assert_eq!(second.word, "b");
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(1000), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_millis(1010), "elapsed {elapsed:?}");
}
