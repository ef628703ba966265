use std::time::Duration;

use crate::api::RawProfile;
use crate::config::ClientConfig;
use crate::deck::{Deck, Direction, TransitionTicket};
use crate::store::{Generation, LoadRequest};
use crate::Result;

const LOG_PREFIX: &str = "[gesture]";

/// Pointer position that counts as "no sample taken".
pub const UNSET_SAMPLE: f32 = 0.0;

/// Delivers a settle for a ticket after a delay, at most one at a time.
pub trait SettleTimer {
    /// Arrange for `ticket` to settle after `delay`.
    fn schedule(&mut self, ticket: TransitionTicket, delay: Duration);

    /// Abandon the scheduled settle, if any.
    fn cancel(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Finger travelled towards smaller x
    Left,
    Right,
}

/// What a gesture or a button resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckAction {
    Advance,
    Retreat,
    Like,
    Dislike,
}

/// Horizontal start and end of one touch.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GestureSample {
    start: Option<f32>,
    end: Option<f32>,
}

fn sample(x: f32) -> Option<f32> {
    (x != UNSET_SAMPLE && x.is_finite()).then_some(x)
}

impl GestureSample {
    pub fn new(start: f32, end: f32) -> Self {
        Self {
            start: sample(start),
            end: sample(end),
        }
    }

    pub fn press(&mut self, x: f32) {
        self.start = sample(x);
    }

    pub fn release(&mut self, x: f32) {
        self.end = sample(x);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_unset(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// `start - end` when both ends were sampled.
    pub fn distance(&self) -> Option<f32> {
        Some(self.start? - self.end?)
    }

    /// Swipe direction once the travel exceeds `threshold`.
    pub fn classify(&self, threshold: f32) -> Option<SwipeDirection> {
        let distance = self.distance()?;
        if distance > threshold {
            Some(SwipeDirection::Left)
        } else if distance < -threshold {
            Some(SwipeDirection::Right)
        } else {
            None
        }
    }
}

/// Turns touches and button taps into deck moves and owns the settle
/// timer that commits them.
#[derive(Debug)]
pub struct GestureInterpreter<T> {
    sample: GestureSample,
    timer: T,
    settle_delay: Duration,
    threshold: f32,
}

impl<T: SettleTimer> GestureInterpreter<T> {
    pub fn new(timer: T, settle_delay: Duration, threshold: f32) -> Self {
        Self {
            sample: GestureSample::default(),
            timer,
            settle_delay,
            threshold,
        }
    }

    pub fn from_config(timer: T, config: &ClientConfig) -> Self {
        Self::new(timer, config.settle_delay(), config.swipe_threshold)
    }

    pub fn sample(&self) -> GestureSample {
        self.sample
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    pub fn pointer_down(&mut self, x: f32) {
        self.sample.press(x);
    }

    /// Finish a gesture. Both samples are cleared whatever the outcome.
    pub fn pointer_up(&mut self, deck: &mut Deck, x: f32) -> Option<DeckAction> {
        self.sample.release(x);
        let swipe = self.sample.classify(self.threshold);
        log::debug!(
            "{} gesture {:?} -> {:?}",
            LOG_PREFIX,
            self.sample.distance(),
            swipe
        );
        self.sample.clear();

        match swipe? {
            SwipeDirection::Left => {
                self.advance(deck).then_some(DeckAction::Advance)
            }
            SwipeDirection::Right => {
                self.retreat(deck).then_some(DeckAction::Retreat)
            }
        }
    }

    /// Move to the next profile, wrapping around after the last one.
    pub fn advance(&mut self, deck: &mut Deck) -> bool {
        self.start(deck, Direction::Forward)
    }

    /// Move to the previous profile. No-op at the first one.
    pub fn retreat(&mut self, deck: &mut Deck) -> bool {
        self.start(deck, Direction::Backward)
    }

    /// Toggle the like of the current profile, then advance.
    pub fn like(&mut self, deck: &mut Deck) -> bool {
        if deck.toggle_current_like().is_none() {
            return false;
        }
        self.advance(deck)
    }

    pub fn dislike(&mut self, deck: &mut Deck) -> bool {
        self.advance(deck)
    }

    pub fn perform(&mut self, deck: &mut Deck, action: DeckAction) -> bool {
        match action {
            DeckAction::Advance => self.advance(deck),
            DeckAction::Retreat => self.retreat(deck),
            DeckAction::Like => self.like(deck),
            DeckAction::Dislike => self.dislike(deck),
        }
    }

    /// Timer callback. Returns whether the cursor moved.
    pub fn settle(&mut self, deck: &mut Deck, ticket: TransitionTicket) -> bool {
        deck.commit(ticket).is_some()
    }

    pub fn begin_reload(
        &mut self,
        deck: &mut Deck,
        exclude: Option<&str>,
    ) -> LoadRequest {
        deck.store_mut().begin_load(exclude)
    }

    /// Land a profile-list result; a pending transition is abandoned
    /// along with the old list.
    pub fn finish_reload(
        &mut self,
        deck: &mut Deck,
        generation: Generation,
        outcome: Result<Vec<RawProfile>>,
    ) -> bool {
        let (applied, dropped) = deck.apply_load(generation, outcome);
        if dropped.is_some() {
            self.timer.cancel();
        }
        applied
    }

    fn start(&mut self, deck: &mut Deck, direction: Direction) -> bool {
        match deck.begin(direction) {
            Some(ticket) => {
                self.timer.cancel();
                self.timer.schedule(ticket, self.settle_delay);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{CursorState, TransitionVisual};
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;
    use rstest::rstest;

    /// Records what would have been scheduled.
    #[derive(Debug, Default)]
    struct ManualTimer {
        scheduled: Option<TransitionTicket>,
        schedules: usize,
        cancels: usize,
    }

    impl SettleTimer for ManualTimer {
        fn schedule(&mut self, ticket: TransitionTicket, _delay: Duration) {
            self.scheduled = Some(ticket);
            self.schedules += 1;
        }

        fn cancel(&mut self) {
            if self.scheduled.take().is_some() {
                self.cancels += 1;
            }
        }
    }

    type Interpreter = GestureInterpreter<ManualTimer>;

    fn interpreter() -> Interpreter {
        GestureInterpreter::new(
            ManualTimer::default(),
            Duration::from_millis(300),
            50.0,
        )
    }

    fn deck_of(interpreter: &mut Interpreter, len: usize) -> Deck {
        let mut deck = Deck::new();
        let request = interpreter.begin_reload(&mut deck, Some("me"));
        let records = (0..len as i64)
            .map(|id| RawProfile {
                id,
                username: format!("p{id}"),
                fullname: format!("P{id}"),
                photo_data: None,
            })
            .collect();
        assert!(interpreter.finish_reload(
            &mut deck,
            request.generation,
            Ok(records)
        ));
        deck
    }

    /// Fire the scheduled settle, as the timer would after the delay.
    fn elapse(interpreter: &mut Interpreter, deck: &mut Deck) -> bool {
        match interpreter.timer.scheduled.take() {
            Some(ticket) => interpreter.settle(deck, ticket),
            None => false,
        }
    }

    #[rstest]
    #[case(200.0, 100.0, Some(SwipeDirection::Left))]
    #[case(100.0, 200.0, Some(SwipeDirection::Right))]
    #[case(200.0, 150.0, None)]
    #[case(150.0, 200.0, None)]
    #[case(200.0, 149.5, Some(SwipeDirection::Left))]
    #[case(0.0, 300.0, None)]
    #[case(300.0, 0.0, None)]
    fn test_classify(
        #[case] start: f32,
        #[case] end: f32,
        #[case] expected: Option<SwipeDirection>,
    ) {
        assert_eq!(GestureSample::new(start, end).classify(50.0), expected);
    }

    #[test]
    fn test_dead_zone_resets_samples() {
        let mut gestures = interpreter();
        let mut deck = deck_of(&mut gestures, 3);

        gestures.pointer_down(120.0);
        assert_eq!(gestures.pointer_up(&mut deck, 100.0), None);
        assert!(gestures.sample().is_unset());
        assert_eq!(gestures.timer().schedules, 0);
        assert_eq!(deck.state(), CursorState::Active { cursor: 0 });
    }

    #[test]
    fn test_one_sided_touch_fires_nothing() {
        let mut gestures = interpreter();
        let mut deck = deck_of(&mut gestures, 3);

        assert_eq!(gestures.pointer_up(&mut deck, 10.0), None);
        assert!(gestures.sample().is_unset());
        assert_eq!(gestures.timer().schedules, 0);
    }

    #[test]
    fn test_swipes_move_the_deck() {
        let mut gestures = interpreter();
        let mut deck = deck_of(&mut gestures, 3);

        gestures.pointer_down(300.0);
        assert_eq!(
            gestures.pointer_up(&mut deck, 100.0),
            Some(DeckAction::Advance)
        );
        assert_eq!(deck.visual(), TransitionVisual::Left);
        assert!(elapse(&mut gestures, &mut deck));
        assert_eq!(deck.cursor(), Some(1));

        gestures.pointer_down(100.0);
        assert_eq!(
            gestures.pointer_up(&mut deck, 300.0),
            Some(DeckAction::Retreat)
        );
        assert_eq!(deck.visual(), TransitionVisual::Right);
        assert!(elapse(&mut gestures, &mut deck));
        assert_eq!(deck.cursor(), Some(0));

        // right swipe at the first card does nothing
        gestures.pointer_down(100.0);
        assert_eq!(gestures.pointer_up(&mut deck, 300.0), None);
        assert!(gestures.sample().is_unset());
    }

    #[test]
    fn test_retreat_at_start_schedules_nothing() {
        let mut gestures = interpreter();
        let mut deck = deck_of(&mut gestures, 3);

        assert!(!gestures.retreat(&mut deck));
        assert_eq!(deck.state(), CursorState::Active { cursor: 0 });
        assert_eq!(gestures.timer().schedules, 0);
    }

    #[test]
    fn test_empty_deck_is_inert() {
        let mut gestures = interpreter();
        let mut deck = deck_of(&mut gestures, 0);

        assert!(!gestures.advance(&mut deck));
        assert!(!gestures.retreat(&mut deck));
        assert!(!gestures.like(&mut deck));
        assert!(!gestures.dislike(&mut deck));
        gestures.pointer_down(300.0);
        assert_eq!(gestures.pointer_up(&mut deck, 10.0), None);

        assert_eq!(deck.state(), CursorState::Empty);
        assert!(deck.likes().is_empty());
        assert_eq!(gestures.timer().schedules, 0);
    }

    #[test]
    fn test_second_gesture_cancels_first() {
        let mut gestures = interpreter();
        let mut deck = deck_of(&mut gestures, 3);

        assert!(gestures.advance(&mut deck));
        let first = deck.pending().unwrap();
        assert!(gestures.advance(&mut deck));

        assert_eq!(gestures.timer().cancels, 1);
        assert!(!gestures.settle(&mut deck, first));
        assert!(elapse(&mut gestures, &mut deck));
        assert_eq!(deck.cursor(), Some(1));
    }

    #[test]
    fn test_like_twice_restores_membership() {
        let mut gestures = interpreter();
        let mut deck = deck_of(&mut gestures, 3);

        assert!(gestures.like(&mut deck));
        assert!(deck.is_liked(0));
        // settle hasn't fired, so the same profile is still current
        assert!(gestures.like(&mut deck));
        assert!(!deck.is_liked(0));
        assert_eq!(gestures.timer().schedules, 2);

        assert!(elapse(&mut gestures, &mut deck));
        assert_eq!(deck.cursor(), Some(1));
    }

    #[test]
    fn test_end_to_end_walkthrough() {
        let mut gestures = interpreter();
        let mut deck = deck_of(&mut gestures, 3);

        assert!(gestures.like(&mut deck));
        assert_eq!(
            deck.liked_profiles().iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![0]
        );
        assert!(elapse(&mut gestures, &mut deck));
        assert_eq!(deck.cursor(), Some(1));

        assert!(gestures.retreat(&mut deck));
        assert!(elapse(&mut gestures, &mut deck));
        assert_eq!(deck.cursor(), Some(0));

        let mut seen = Vec::new();
        for _ in 0..3 {
            assert!(gestures.advance(&mut deck));
            assert!(elapse(&mut gestures, &mut deck));
            seen.push(deck.cursor().unwrap());
        }
        assert_eq!(seen, vec![1, 2, 0]);
    }

    #[test]
    fn test_reload_cancels_pending_settle() {
        let mut gestures = interpreter();
        let mut deck = deck_of(&mut gestures, 3);

        assert!(gestures.advance(&mut deck));
        let ticket = deck.pending().unwrap();

        let request = gestures.begin_reload(&mut deck, Some("me"));
        assert!(gestures.finish_reload(
            &mut deck,
            request.generation,
            Ok(Vec::new())
        ));
        assert_eq!(gestures.timer().cancels, 1);
        assert!(!gestures.settle(&mut deck, ticket));
        assert_eq!(deck.state(), CursorState::Empty);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Advance,
        Retreat,
        Like,
        Dislike,
        Settle,
    }

    impl Arbitrary for Op {
        fn arbitrary(g: &mut Gen) -> Self {
            match u8::arbitrary(g) % 5 {
                0 => Op::Advance,
                1 => Op::Retreat,
                2 => Op::Like,
                3 => Op::Dislike,
                _ => Op::Settle,
            }
        }
    }

    #[quickcheck]
    fn prop_cursor_stays_in_bounds(len: u8, ops: Vec<Op>) -> bool {
        let len = (len % 12) as usize;
        let mut gestures = interpreter();
        let mut deck = deck_of(&mut gestures, len);

        for op in ops {
            match op {
                Op::Advance => {
                    gestures.advance(&mut deck);
                }
                Op::Retreat => {
                    gestures.retreat(&mut deck);
                }
                Op::Like => {
                    gestures.like(&mut deck);
                }
                Op::Dislike => {
                    gestures.dislike(&mut deck);
                }
                Op::Settle => {
                    elapse(&mut gestures, &mut deck);
                }
            }
            let in_bounds = match deck.cursor() {
                Some(cursor) => cursor < len,
                None => len == 0,
            };
            if !in_bounds || deck.likes().len() > len {
                return false;
            }
        }
        true
    }

    #[quickcheck]
    fn prop_full_cycle_returns_to_start(len: u8) -> bool {
        let len = (len % 20) as usize + 1;
        let mut gestures = interpreter();
        let mut deck = deck_of(&mut gestures, len);

        for _ in 0..len {
            gestures.advance(&mut deck);
            elapse(&mut gestures, &mut deck);
        }
        deck.cursor() == Some(0)
    }

    #[quickcheck]
    fn prop_liked_order_is_deck_order(picks: Vec<u8>) -> bool {
        let mut gestures = interpreter();
        let mut deck = deck_of(&mut gestures, 8);

        for pick in picks {
            let target = (pick % 8) as usize;
            while deck.cursor() != Some(target) {
                gestures.advance(&mut deck);
                elapse(&mut gestures, &mut deck);
            }
            gestures.like(&mut deck);
            elapse(&mut gestures, &mut deck);
        }

        let ids: Vec<i64> =
            deck.liked_profiles().iter().map(|p| p.id).collect();
        ids.windows(2).all(|w| w[0] < w[1]) && ids.len() == deck.likes().len()
    }
}
