//! Client core of a swipe-to-browse dating app.
//!
//! A [`screen::DeckScreen`] loads candidate profiles from the backend,
//! keeps a cursor into them and a set of liked profiles, and turns
//! swipes and button taps into timed transitions of that cursor.

pub mod account;
pub mod api;
pub mod config;
pub mod deck;
mod errors;
pub mod gesture;
pub mod profile;
pub mod screen;
pub mod session;
pub mod store;
pub mod timer;

pub use account::{AccountDraft, AccountUpdate, UserAccount};
pub use api::{HttpApi, ProfileSource, RawProfile};
pub use config::ClientConfig;
pub use deck::{
    CursorState, Deck, DeckPosition, Direction, LikeSet, TransitionTicket,
    TransitionVisual,
};
pub use errors::{MatchdeckError, Result};
pub use gesture::{
    DeckAction, GestureInterpreter, GestureSample, SettleTimer, SwipeDirection,
};
pub use profile::{PhotoRef, Profile, ProfileId, PLACEHOLDER_PHOTO_URL};
pub use screen::{CardView, DeckScreen, DeckView, ScreenEvent};
pub use session::Session;
pub use store::{Generation, LoadRequest, LoadStatus, ProfileStore};
pub use timer::TokioSettleTimer;
