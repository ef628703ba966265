use std::collections::HashSet;
use std::fmt;

use crate::api::RawProfile;
use crate::profile::{Profile, ProfileId};
use crate::store::{Generation, LoadStatus, ProfileStore};
use crate::Result;

const LOG_PREFIX: &str = "[deck]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

/// Identifies one scheduled settle. A settle carrying any other ticket
/// than the pending one is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitionTicket(u64);

impl TransitionTicket {
    #[cfg(test)]
    pub(crate) fn for_tests(n: u64) -> Self {
        Self(n)
    }
}

impl fmt::Display for TransitionTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    Empty,
    Active {
        cursor: usize,
    },
    /// `cursor` is still the committed position; it moves when the
    /// transition settles.
    Transitioning {
        cursor: usize,
        direction: Direction,
        ticket: TransitionTicket,
    },
}

/// Visual class of the current card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionVisual {
    Center,
    Left,
    Right,
}

impl TransitionVisual {
    pub fn as_class(&self) -> &'static str {
        match self {
            TransitionVisual::Center => "center",
            TransitionVisual::Left => "left",
            TransitionVisual::Right => "right",
        }
    }
}

/// Index into the profile list.
///
/// Invariant: outside of `Empty`, `cursor < len` for the `len` the cursor
/// was last reset with.
#[derive(Debug)]
pub struct DeckCursor {
    state: CursorState,
    next_ticket: u64,
}

impl Default for DeckCursor {
    fn default() -> Self {
        Self {
            state: CursorState::Empty,
            next_ticket: 0,
        }
    }
}

impl DeckCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn cursor(&self) -> Option<usize> {
        match self.state {
            CursorState::Empty => None,
            CursorState::Active { cursor }
            | CursorState::Transitioning { cursor, .. } => Some(cursor),
        }
    }

    pub fn pending(&self) -> Option<TransitionTicket> {
        match self.state {
            CursorState::Transitioning { ticket, .. } => Some(ticket),
            _ => None,
        }
    }

    pub fn visual(&self) -> TransitionVisual {
        match self.state {
            CursorState::Transitioning {
                direction: Direction::Forward,
                ..
            } => TransitionVisual::Left,
            CursorState::Transitioning {
                direction: Direction::Backward,
                ..
            } => TransitionVisual::Right,
            _ => TransitionVisual::Center,
        }
    }

    /// Point at the first of `len` profiles, dropping any pending
    /// transition. Returns the dropped ticket.
    pub(crate) fn reset(&mut self, len: usize) -> Option<TransitionTicket> {
        let dropped = self.pending();
        self.state = if len == 0 {
            CursorState::Empty
        } else {
            CursorState::Active { cursor: 0 }
        };
        dropped
    }

    /// Enter `Transitioning` towards `direction`, replacing any pending
    /// transition. Returns `None` when the move isn't possible: the deck
    /// is empty, or a backward move is requested at the first profile.
    pub(crate) fn begin(
        &mut self,
        direction: Direction,
    ) -> Option<TransitionTicket> {
        let cursor = self.cursor()?;
        if direction == Direction::Backward && cursor == 0 {
            return None;
        }

        self.next_ticket = self.next_ticket.wrapping_add(1);
        let ticket = TransitionTicket(self.next_ticket);
        if let Some(replaced) = self.pending() {
            log::debug!(
                "{} transition {} replaced by {}",
                LOG_PREFIX,
                replaced,
                ticket
            );
        }
        self.state = CursorState::Transitioning {
            cursor,
            direction,
            ticket,
        };
        Some(ticket)
    }

    /// Settle the pending transition if `ticket` is the pending one.
    /// Returns the new cursor.
    pub(crate) fn commit(
        &mut self,
        ticket: TransitionTicket,
        len: usize,
    ) -> Option<usize> {
        let (cursor, direction) = match self.state {
            CursorState::Transitioning {
                cursor,
                direction,
                ticket: pending,
            } if pending == ticket => (cursor, direction),
            _ => {
                log::debug!("{} ignoring stale settle {}", LOG_PREFIX, ticket);
                return None;
            }
        };
        if len == 0 {
            self.state = CursorState::Empty;
            return None;
        }

        let next = match direction {
            Direction::Forward => (cursor + 1) % len,
            Direction::Backward => cursor.saturating_sub(1).min(len - 1),
        };
        log::debug!(
            "{} settled {}: {} -> {} of {}",
            LOG_PREFIX,
            ticket,
            cursor,
            next,
            len
        );
        self.state = CursorState::Active { cursor: next };
        Some(next)
    }
}

/// Profiles liked during this session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LikeSet {
    ids: HashSet<ProfileId>,
}

impl LikeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: ProfileId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Like or un-like; returns whether `id` is liked afterwards.
    pub(crate) fn toggle(&mut self, id: ProfileId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Forget identities that no longer appear in `profiles`.
    pub(crate) fn clear(&mut self) {
        self.ids.clear();
    }

    pub(crate) fn retain_present(&mut self, profiles: &[Profile]) {
        let present: HashSet<ProfileId> =
            profiles.iter().map(|p| p.id).collect();
        self.ids.retain(|id| present.contains(id));
    }

    /// Liked members of `profiles`, in the order of `profiles`.
    pub fn project<'a>(&self, profiles: &'a [Profile]) -> Vec<&'a Profile> {
        profiles
            .iter()
            .filter(|p| self.contains(p.id))
            .collect()
    }
}

/// 1-based position for display, e.g. `3 / 10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckPosition {
    pub index: usize,
    pub total: usize,
}

impl fmt::Display for DeckPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.index + 1, self.total)
    }
}

/// Candidate list, cursor and likes of one screen session.
///
/// Everything outside the crate gets read access only; changes go
/// through [`crate::gesture::GestureInterpreter`].
#[derive(Debug, Default)]
pub struct Deck {
    store: ProfileStore,
    cursor: DeckCursor,
    likes: LikeSet,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    pub fn profiles(&self) -> &[Profile] {
        self.store.profiles()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn state(&self) -> CursorState {
        self.cursor.state()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor.cursor()
    }

    pub fn pending(&self) -> Option<TransitionTicket> {
        self.cursor.pending()
    }

    pub fn visual(&self) -> TransitionVisual {
        self.cursor.visual()
    }

    pub fn current(&self) -> Option<&Profile> {
        self.cursor().and_then(|i| self.store.get(i))
    }

    pub fn position(&self) -> Option<DeckPosition> {
        self.cursor().map(|index| DeckPosition {
            index,
            total: self.len(),
        })
    }

    pub fn likes(&self) -> &LikeSet {
        &self.likes
    }

    pub fn is_liked(&self, id: ProfileId) -> bool {
        self.likes.contains(id)
    }

    pub fn liked_profiles(&self) -> Vec<&Profile> {
        self.likes.project(self.store.profiles())
    }

    pub(crate) fn store_mut(&mut self) -> &mut ProfileStore {
        &mut self.store
    }

    /// Land a profile-list result. On success or failure the cursor is
    /// reset; a stale result changes nothing. Returns the transition
    /// ticket that was dropped by the reset, if any.
    pub(crate) fn apply_load(
        &mut self,
        generation: Generation,
        outcome: Result<Vec<RawProfile>>,
    ) -> (bool, Option<TransitionTicket>) {
        if !self.store.apply(generation, outcome) {
            return (false, None);
        }
        let dropped = self.cursor.reset(self.store.len());
        if let Some(ticket) = dropped {
            log::debug!(
                "{} reload dropped pending transition {}",
                LOG_PREFIX,
                ticket
            );
        }
        if *self.store.status() == LoadStatus::Loaded {
            self.likes.retain_present(self.store.profiles());
        }
        (true, dropped)
    }

    pub(crate) fn begin(
        &mut self,
        direction: Direction,
    ) -> Option<TransitionTicket> {
        // the card is hidden until the pending load lands
        if self.store.is_empty() || self.store.is_loading() {
            return None;
        }
        self.cursor.begin(direction)
    }

    pub(crate) fn commit(&mut self, ticket: TransitionTicket) -> Option<usize> {
        self.cursor.commit(ticket, self.store.len())
    }

    /// Forget every like, for a session that belongs to someone else.
    pub(crate) fn clear_likes(&mut self) {
        if !self.likes.is_empty() {
            log::debug!("{} clearing {} likes", LOG_PREFIX, self.likes.len());
        }
        self.likes.clear();
    }

    /// Toggle the like of the profile under the cursor.
    pub(crate) fn toggle_current_like(&mut self) -> Option<(ProfileId, bool)> {
        if self.store.is_loading() {
            return None;
        }
        let id = self.current()?.id;
        let liked = self.likes.toggle(id);
        log::debug!(
            "{} profile {} {}",
            LOG_PREFIX,
            id,
            if liked { "liked" } else { "unliked" }
        );
        Some((id, liked))
    }
}
