use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use matchdeck::screen::{EMPTY_DECK_MESSAGE, LOADING_MESSAGE};
use matchdeck::{
    ClientConfig, DeckAction, DeckScreen, MatchdeckError, ProfileSource,
    RawProfile, Result, Session, TransitionVisual,
};

const SETTLE: Duration = Duration::from_millis(300);

fn raw(id: i64, username: &str) -> RawProfile {
    RawProfile {
        id,
        username: username.to_owned(),
        fullname: username.to_uppercase(),
        photo_data: None,
    }
}

/// Answers requests from a script, each after its own delay.
struct ScriptedSource {
    replies: Mutex<VecDeque<(Duration, Result<Vec<RawProfile>>)>>,
    requests: Mutex<Vec<Option<String>>>,
}

impl ScriptedSource {
    fn new(
        replies: Vec<(Duration, Result<Vec<RawProfile>>)>,
    ) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ProfileSource for ScriptedSource {
    async fn fetch_profiles(
        &self,
        exclude: Option<&str>,
    ) -> Result<Vec<RawProfile>> {
        self.requests
            .lock()
            .unwrap()
            .push(exclude.map(str::to_owned));
        let next = self.replies.lock().unwrap().pop_front();
        let (delay, reply) = next.expect("unexpected request");
        tokio::time::sleep(delay).await;
        reply
    }
}

fn screen(source: Arc<ScriptedSource>, username: &str) -> DeckScreen {
    DeckScreen::new(
        Session::new(username, None),
        source,
        &ClientConfig::default(),
    )
}

async fn loaded_screen(ids: &[i64]) -> DeckScreen {
    let profiles = ids
        .iter()
        .map(|&id| raw(id, &format!("user{id}")))
        .collect();
    let source = ScriptedSource::new(vec![(Duration::ZERO, Ok(profiles))]);
    let mut screen = screen(source, "me");
    screen.reload();
    assert!(screen.process_next().await);
    screen
}

#[tokio::test(start_paused = true)]
async fn test_load_excludes_session_user() {
    let source = ScriptedSource::new(vec![(
        Duration::from_millis(50),
        Ok(vec![raw(1, "bob"), raw(2, "cid")]),
    )]);
    let mut screen = screen(source.clone(), "anna");

    screen.reload();
    let view = screen.view();
    assert!(view.loading);
    assert_eq!(view.message, Some(LOADING_MESSAGE));

    assert!(screen.process_next().await);
    assert_eq!(*source.requests.lock().unwrap(), vec![Some("anna".to_owned())]);

    let view = screen.view();
    assert!(!view.loading);
    assert_eq!(view.card.unwrap().handle, "@bob");
    assert_eq!(view.position.unwrap().to_string(), "1 / 2");
    assert_eq!(view.visual, TransitionVisual::Center);
}

#[tokio::test(start_paused = true)]
async fn test_failed_load_shows_empty_state() {
    let source = ScriptedSource::new(vec![(
        Duration::from_millis(10),
        Err(MatchdeckError::Http {
            status: 503,
            url: "http://localhost:8000/users".to_owned(),
        }),
    )]);
    let mut screen = screen(source, "anna");

    screen.reload();
    assert!(screen.process_next().await);

    let view = screen.view();
    assert!(!view.loading);
    assert_eq!(view.card, None);
    assert_eq!(view.position, None);
    assert_eq!(view.message, Some(EMPTY_DECK_MESSAGE));
    assert!(view.error.is_some());

    assert!(!screen.advance());
    assert!(!screen.retreat());
    assert!(!screen.like());
}

#[tokio::test(start_paused = true)]
async fn test_late_result_of_old_session_is_dropped() {
    let source = ScriptedSource::new(vec![
        (Duration::from_millis(500), Ok(vec![raw(1, "bob")])),
        (
            Duration::from_millis(20),
            Ok(vec![raw(2, "anna"), raw(3, "cid")]),
        ),
    ]);
    let mut screen = screen(source.clone(), "anna");

    screen.reload();
    screen.switch_session(Session::new("bob", None));

    // the newer request lands first
    assert!(screen.process_next().await);
    assert_eq!(screen.deck().len(), 2);

    // the older one arrives later and is discarded
    assert!(!screen.process_next().await);
    assert_eq!(screen.deck().len(), 2);
    assert_eq!(screen.view().card.unwrap().handle, "@anna");
    assert_eq!(
        *source.requests.lock().unwrap(),
        vec![Some("anna".to_owned()), Some("bob".to_owned())]
    );
}

#[tokio::test(start_paused = true)]
async fn test_walkthrough_with_real_timer() {
    let mut screen = loaded_screen(&[10, 11, 12]).await;

    assert!(screen.like());
    assert_eq!(screen.view().visual, TransitionVisual::Left);
    assert_eq!(screen.view().like_count, 1);
    // not settled yet
    assert_eq!(screen.deck().cursor(), Some(0));

    assert!(screen.process_next().await);
    assert_eq!(screen.deck().cursor(), Some(1));
    assert_eq!(screen.view().visual, TransitionVisual::Center);

    assert!(screen.retreat());
    assert_eq!(screen.view().visual, TransitionVisual::Right);
    assert!(screen.process_next().await);
    assert_eq!(screen.deck().cursor(), Some(0));

    let mut seen = Vec::new();
    for _ in 0..3 {
        assert!(screen.dislike());
        assert!(screen.process_next().await);
        seen.push(screen.deck().cursor().unwrap());
    }
    assert_eq!(seen, vec![1, 2, 0]);

    let liked: Vec<i64> = screen.liked_cards().iter().map(|c| c.id).collect();
    assert_eq!(liked, vec![10]);
}

#[tokio::test(start_paused = true)]
async fn test_rapid_gestures_commit_once() {
    let mut screen = loaded_screen(&[1, 2, 3]).await;

    screen.pointer_down(400.0);
    assert_eq!(screen.pointer_up(100.0), Some(DeckAction::Advance));
    tokio::time::sleep(SETTLE / 2).await;
    screen.pointer_down(400.0);
    assert_eq!(screen.pointer_up(100.0), Some(DeckAction::Advance));

    tokio::time::sleep(SETTLE * 4).await;
    assert_eq!(screen.poll_events(), 1);
    assert_eq!(screen.deck().cursor(), Some(1));
}

#[tokio::test(start_paused = true)]
async fn test_liked_cards_follow_deck_order() {
    let mut screen = loaded_screen(&[1, 2, 3]).await;

    // move to C and like it, which wraps back to A
    for _ in 0..2 {
        assert!(screen.advance());
        assert!(screen.process_next().await);
    }
    assert!(screen.like());
    assert!(screen.process_next().await);
    assert_eq!(screen.deck().cursor(), Some(0));

    assert!(screen.like());
    assert!(screen.process_next().await);

    let liked: Vec<i64> = screen.liked_cards().iter().map(|c| c.id).collect();
    assert_eq!(liked, vec![1, 3]);
    assert!(screen.liked_cards().iter().all(|c| c.liked));
}

#[tokio::test(start_paused = true)]
async fn test_reload_mid_swipe_discards_settle() {
    let source = ScriptedSource::new(vec![
        (Duration::ZERO, Ok(vec![raw(1, "a"), raw(2, "b"), raw(3, "c")])),
        (Duration::from_millis(10), Ok(vec![raw(4, "d"), raw(5, "e")])),
    ]);
    let mut screen = screen(source, "me");
    screen.reload();
    assert!(screen.process_next().await);

    assert!(screen.advance());
    screen.reload();
    // the reload lands before the settle would have fired
    assert!(screen.process_next().await);

    tokio::time::sleep(SETTLE * 4).await;
    assert_eq!(screen.poll_events(), 0);
    assert_eq!(screen.view().position.unwrap().to_string(), "1 / 2");
    assert_eq!(screen.view().card.unwrap().handle, "@d");
}

#[tokio::test(start_paused = true)]
async fn test_session_switch_forgets_likes() {
    let source = ScriptedSource::new(vec![
        (Duration::ZERO, Ok(vec![raw(1, "bob"), raw(2, "cid")])),
        (Duration::from_millis(10), Ok(vec![raw(1, "bob"), raw(3, "anna")])),
    ]);
    let mut screen = screen(source, "anna");
    screen.reload();
    assert!(screen.process_next().await);

    assert!(screen.like());
    assert!(screen.process_next().await);
    assert_eq!(screen.view().like_count, 1);

    screen.switch_session(Session::new("zoe", None));
    assert!(screen.process_next().await);

    let view = screen.view();
    assert_eq!(view.card.unwrap().handle, "@bob");
    assert_eq!(view.like_count, 0);
    assert!(screen.liked_cards().is_empty());
    assert!(!screen.deck().is_liked(1));
}

#[tokio::test(start_paused = true)]
async fn test_actions_wait_for_pending_reload() {
    let deck = || vec![raw(1, "a"), raw(2, "b"), raw(3, "c")];
    let source = ScriptedSource::new(vec![
        (Duration::ZERO, Ok(deck())),
        (Duration::from_millis(50), Ok(deck())),
    ]);
    let mut screen = screen(source, "me");
    screen.reload();
    assert!(screen.process_next().await);

    screen.reload();
    assert!(screen.view().loading);
    assert!(!screen.like());
    assert!(!screen.advance());
    assert!(!screen.dislike());
    screen.pointer_down(400.0);
    assert_eq!(screen.pointer_up(100.0), None);
    assert_eq!(screen.view().like_count, 0);
    assert_eq!(screen.deck().pending(), None);

    assert!(screen.process_next().await);
    assert!(screen.like());
    assert_eq!(screen.view().like_count, 1);
    assert!(screen.deck().is_liked(1));
}
