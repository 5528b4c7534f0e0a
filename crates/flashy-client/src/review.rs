//! Review session state machine.
//!
//! A session shuffles a deck's cards once and walks through them one at a
//! time: the front is shown (`Question`), the card is flipped (`Answer`), a
//! grade is given and, after a short pacing delay (`Advancing`), the next
//! card is shown or the session is `Complete`.
//!
//! Grades are recorded for display only. They are not persisted and do not
//! influence ordering: `Again` and `Easy` lead to exactly the same
//! transitions. Sessions are never saved; dropping one discards all progress.

use std::time::Duration;

use flashy_shared::Card;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Pause between grading a card and showing the next one.
pub const TRANSITION_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Again,
    Hard,
    Good,
    Easy,
}

impl Grade {
    pub const ALL: [Grade; 4] = [Grade::Again, Grade::Hard, Grade::Good, Grade::Easy];

    /// Keyboard shortcut: `1`..`4` map to again..easy.
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            '1' => Some(Grade::Again),
            '2' => Some(Grade::Hard),
            '3' => Some(Grade::Good),
            '4' => Some(Grade::Easy),
            _ => None,
        }
    }
}

/// What a key press asks the review screen to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewKey {
    /// Space or Enter.
    Flip,
    /// `1`..`4`.
    Grade(Grade),
    /// Escape: leave the session without saving anything.
    Exit,
}

impl ReviewKey {
    /// Map a key name as reported by the UI (`" "`, `"Enter"`, `"1"`, `"Escape"`, ...).
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            " " | "Enter" => Some(ReviewKey::Flip),
            "Escape" => Some(ReviewKey::Exit),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Grade::from_key(c).map(ReviewKey::Grade),
                    _ => None,
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Current card shown front only.
    Question,
    /// Current card flipped.
    Answer,
    /// A grade was recorded and the move to the next card is in flight.
    Advancing,
    /// Every card has been graded.
    Complete,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReviewError {
    #[error("No cards to review")]
    EmptyDeck,

    #[error("Cannot {action} while in {phase:?}")]
    InvalidTransition { action: &'static str, phase: Phase },

    /// Input arrived during the pacing delay.
    #[error("Transition in progress")]
    Busy,
}

#[derive(Debug, Clone)]
pub struct ReviewSession {
    cards: Vec<Card>,
    cursor: usize,
    phase: Phase,
    graded: Vec<Uuid>,
}

impl ReviewSession {
    /// Start a session over `cards` in a fresh random order.
    pub fn start(cards: Vec<Card>) -> Result<Self, ReviewError> {
        Self::start_with_rng(cards, &mut rand::thread_rng())
    }

    pub fn start_with_rng<R: Rng + ?Sized>(
        mut cards: Vec<Card>,
        rng: &mut R,
    ) -> Result<Self, ReviewError> {
        if cards.is_empty() {
            return Err(ReviewError::EmptyDeck);
        }
        cards.shuffle(rng);
        Ok(Self {
            cards,
            cursor: 0,
            phase: Phase::Question,
            graded: Vec::new(),
        })
    }

    /// Show the answer. Flipping an already flipped card does nothing.
    pub fn flip(&mut self) -> Result<(), ReviewError> {
        match self.phase {
            Phase::Question => {
                self.phase = Phase::Answer;
                Ok(())
            }
            Phase::Answer => Ok(()),
            Phase::Advancing => Err(ReviewError::Busy),
            Phase::Complete => Err(self.invalid("flip")),
        }
    }

    /// Record a grade for the current card and begin moving on.
    ///
    /// Must be followed by [`advance`](Self::advance); until then further
    /// input is rejected with [`ReviewError::Busy`].
    pub fn grade(&mut self, _grade: Grade) -> Result<(), ReviewError> {
        match self.phase {
            Phase::Answer => {
                let id = self.cards[self.cursor].id;
                if !self.graded.contains(&id) {
                    self.graded.push(id);
                }
                self.phase = Phase::Advancing;
                Ok(())
            }
            Phase::Advancing => Err(ReviewError::Busy),
            Phase::Question | Phase::Complete => Err(self.invalid("grade")),
        }
    }

    /// Finish the transition started by [`grade`](Self::grade).
    pub fn advance(&mut self) -> Result<Phase, ReviewError> {
        if self.phase != Phase::Advancing {
            return Err(self.invalid("advance"));
        }
        if self.cursor + 1 >= self.cards.len() {
            self.phase = Phase::Complete;
        } else {
            self.cursor += 1;
            self.phase = Phase::Question;
        }
        Ok(self.phase)
    }

    /// Grade and advance in one step, without pacing.
    pub fn grade_and_advance(&mut self, grade: Grade) -> Result<Phase, ReviewError> {
        self.grade(grade)?;
        self.advance()
    }

    /// Re-shuffle the same cards and begin again. Only valid once complete.
    pub fn restart(&mut self) -> Result<(), ReviewError> {
        self.restart_with_rng(&mut rand::thread_rng())
    }

    pub fn restart_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), ReviewError> {
        if self.phase != Phase::Complete {
            return Err(self.invalid("restart"));
        }
        self.cards.shuffle(rng);
        self.cursor = 0;
        self.phase = Phase::Question;
        self.graded.clear();
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// The card on screen, or `None` once the session is complete.
    pub fn current_card(&self) -> Option<&Card> {
        if self.is_complete() {
            None
        } else {
            self.cards.get(self.cursor)
        }
    }

    /// Whether the current card's answer is showing.
    pub fn is_flipped(&self) -> bool {
        matches!(self.phase, Phase::Answer | Phase::Advancing)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// 1-based position of the current card, for "3 / 10" displays.
    pub fn position(&self) -> usize {
        self.cursor + 1
    }

    pub fn total(&self) -> usize {
        self.cards.len()
    }

    /// Ids graded so far in this session, in grading order.
    pub fn graded(&self) -> &[Uuid] {
        &self.graded
    }

    pub fn is_graded(&self, card_id: Uuid) -> bool {
        self.graded.contains(&card_id)
    }

    /// The session's cards in review order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    fn invalid(&self, action: &'static str) -> ReviewError {
        ReviewError::InvalidTransition {
            action,
            phase: self.phase,
        }
    }
}

/// Drives grading with a pacing delay between a grade and the next card.
///
/// The session stays in [`Phase::Advancing`] for the duration of the delay,
/// so input arriving from elsewhere meanwhile is rejected as
/// [`ReviewError::Busy`] instead of double-advancing.
#[derive(Debug, Clone, Copy)]
pub struct ReviewPacer {
    delay: Duration,
}

impl Default for ReviewPacer {
    fn default() -> Self {
        Self::new(TRANSITION_DELAY)
    }
}

impl ReviewPacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub async fn grade(
        &self,
        session: &Mutex<ReviewSession>,
        grade: Grade,
    ) -> Result<Phase, ReviewError> {
        session.lock().await.grade(grade)?;
        tokio::time::sleep(self.delay).await;
        session.lock().await.advance()
    }
}
