use std::sync::Arc;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::api::{ProfileSource, RawProfile};
use crate::config::ClientConfig;
use crate::deck::{Deck, DeckPosition, TransitionTicket, TransitionVisual};
use crate::gesture::{DeckAction, GestureInterpreter};
use crate::profile::{Profile, ProfileId};
use crate::session::Session;
use crate::store::{Generation, LoadStatus};
use crate::timer::TokioSettleTimer;
use crate::Result;

const LOG_PREFIX: &str = "[screen]";

pub const LOADING_MESSAGE: &str = "Loading profiles...";
pub const EMPTY_DECK_MESSAGE: &str = "No profiles found";
pub const NO_LIKES_MESSAGE: &str = "You haven't liked anyone yet";

/// Completions delivered back to the screen.
#[derive(Debug)]
pub enum ScreenEvent {
    ProfilesLoaded {
        generation: Generation,
        outcome: Result<Vec<RawProfile>>,
    },
    TransitionSettled(TransitionTicket),
}

/// One profile as the renderer shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub id: ProfileId,
    pub fullname: String,
    /// `@username`
    pub handle: String,
    pub photo_src: String,
    pub liked: bool,
}

impl CardView {
    fn new(profile: &Profile, liked: bool) -> Self {
        Self {
            id: profile.id,
            fullname: profile.fullname.clone(),
            handle: format!("@{}", profile.username),
            photo_src: profile.photo_src(),
            liked,
        }
    }
}

/// Snapshot of the home tab.
#[derive(Debug, Clone, PartialEq)]
pub struct DeckView {
    pub loading: bool,
    pub card: Option<CardView>,
    pub position: Option<DeckPosition>,
    pub like_count: usize,
    pub visual: TransitionVisual,
    /// Loading notice, empty-state notice, or nothing
    pub message: Option<&'static str>,
    /// Reason of the last failed load
    pub error: Option<String>,
}

/// Main screen of a logged-in session.
///
/// Owns the deck exclusively. Fetches and settle timers run as tokio
/// tasks and report back through [`ScreenEvent`]s, which the owner feeds
/// to [`DeckScreen::handle_event`] one at a time.
pub struct DeckScreen {
    session: Session,
    source: Arc<dyn ProfileSource>,
    deck: Deck,
    gestures: GestureInterpreter<TokioSettleTimer<ScreenEvent>>,
    tx: UnboundedSender<ScreenEvent>,
    rx: UnboundedReceiver<ScreenEvent>,
}

impl DeckScreen {
    pub fn new(
        session: Session,
        source: Arc<dyn ProfileSource>,
        config: &ClientConfig,
    ) -> Self {
        let (tx, rx) = unbounded_channel();
        let timer =
            TokioSettleTimer::new(tx.clone(), ScreenEvent::TransitionSettled);
        Self {
            session,
            source,
            deck: Deck::new(),
            gestures: GestureInterpreter::from_config(timer, config),
            tx,
            rx,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Request a fresh profile list. Must be called within a tokio
    /// runtime. Results of earlier requests are ignored from now on.
    pub fn reload(&mut self) -> Generation {
        let request = self
            .gestures
            .begin_reload(&mut self.deck, self.session.username());
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let outcome = source
                .fetch_profiles(request.exclude.as_deref())
                .await;
            if tx
                .send(ScreenEvent::ProfilesLoaded {
                    generation: request.generation,
                    outcome,
                })
                .is_err()
            {
                log::debug!(
                    "{} screen closed before generation {} arrived",
                    LOG_PREFIX,
                    request.generation
                );
            }
        });
        request.generation
    }

    /// Log in as someone else and reload for them. Likes belong to the
    /// previous session and are dropped.
    pub fn switch_session(&mut self, session: Session) -> Generation {
        log::info!(
            "{} session switched to {:?}",
            LOG_PREFIX,
            session.username()
        );
        self.session = session;
        self.deck.clear_likes();
        self.reload()
    }

    pub fn pointer_down(&mut self, x: f32) {
        self.gestures.pointer_down(x);
    }

    pub fn pointer_up(&mut self, x: f32) -> Option<DeckAction> {
        self.gestures.pointer_up(&mut self.deck, x)
    }

    pub fn advance(&mut self) -> bool {
        self.gestures.advance(&mut self.deck)
    }

    pub fn retreat(&mut self) -> bool {
        self.gestures.retreat(&mut self.deck)
    }

    pub fn like(&mut self) -> bool {
        self.gestures.like(&mut self.deck)
    }

    pub fn dislike(&mut self) -> bool {
        self.gestures.dislike(&mut self.deck)
    }

    pub fn perform(&mut self, action: DeckAction) -> bool {
        self.gestures.perform(&mut self.deck, action)
    }

    /// Apply one completion. Returns whether the deck changed.
    pub fn handle_event(&mut self, event: ScreenEvent) -> bool {
        match event {
            ScreenEvent::ProfilesLoaded {
                generation,
                outcome,
            } => self
                .gestures
                .finish_reload(&mut self.deck, generation, outcome),
            ScreenEvent::TransitionSettled(ticket) => {
                self.gestures.settle(&mut self.deck, ticket)
            }
        }
    }

    /// Wait for the next completion and apply it.
    pub async fn process_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(event) => self.handle_event(event),
            // unreachable while `self.tx` is alive
            None => false,
        }
    }

    /// Apply every completion that has already arrived, without waiting.
    pub fn poll_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.rx.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    pub fn view(&self) -> DeckView {
        let store = self.deck.store();
        let loading = store.is_loading();
        let error = match store.status() {
            LoadStatus::Failed(reason) => Some(reason.clone()),
            _ => None,
        };
        let card = if loading {
            None
        } else {
            self.deck
                .current()
                .map(|p| CardView::new(p, self.deck.is_liked(p.id)))
        };
        let message = if loading {
            Some(LOADING_MESSAGE)
        } else if self.deck.is_empty() {
            Some(EMPTY_DECK_MESSAGE)
        } else {
            None
        };

        DeckView {
            loading,
            position: card.as_ref().and(self.deck.position()),
            card,
            like_count: self.deck.likes().len(),
            visual: self.deck.visual(),
            message,
            error,
        }
    }

    /// Liked profiles in deck order.
    pub fn liked_cards(&self) -> Vec<CardView> {
        self.deck
            .liked_profiles()
            .into_iter()
            .map(|p| CardView::new(p, true))
            .collect()
    }
}
