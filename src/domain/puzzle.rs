//! Puzzle resolver - riddle answer checking with a bounded attempt budget

use crate::domain::entities::{SceneBody, SceneDefinition};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::SceneKind;

/// Every puzzle allows this many submissions before it fails over
pub const MAX_ATTEMPTS: u32 = 3;

/// Judgement of one submitted answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PuzzleJudgement {
    /// Correct, regardless of how many attempts were already spent
    Solved,
    /// Wrong, but the budget allows another try
    Retry { attempts_used: u32, remaining: u32 },
    /// Wrong on the final attempt; the puzzle resolves to its failure branch
    Exhausted,
}

/// Attempt tracking for the puzzle scene the player is standing in
///
/// The attempt counter is seeded from the stored scene progress so leaving
/// and re-entering a puzzle does not refresh the budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleSession {
    correct_answer: String,
    attempts: u32,
}

impl PuzzleSession {
    pub fn from_scene(scene: &SceneDefinition, attempts_used: u32) -> Result<Self, DomainError> {
        match &scene.body {
            SceneBody::Puzzle { correct_answer, .. } => Ok(Self {
                correct_answer: correct_answer.clone(),
                attempts: attempts_used,
            }),
            _ => Err(DomainError::WrongSceneKind {
                expected: SceneKind::Puzzle,
                actual: scene.kind(),
            }),
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Submit an answer: trimmed, case-insensitive comparison.
    ///
    /// Submitting after the budget is exhausted is an error; the caller
    /// should already have resolved the scene to its failure branch.
    pub fn submit(&mut self, answer: &str) -> Result<PuzzleJudgement, DomainError> {
        if self.attempts >= MAX_ATTEMPTS {
            return Err(DomainError::invalid_state("no puzzle attempts remain"));
        }
        self.attempts += 1;

        if Self::normalize(answer) == Self::normalize(&self.correct_answer) {
            return Ok(PuzzleJudgement::Solved);
        }
        if self.attempts >= MAX_ATTEMPTS {
            Ok(PuzzleJudgement::Exhausted)
        } else {
            Ok(PuzzleJudgement::Retry {
                attempts_used: self.attempts,
                remaining: MAX_ATTEMPTS - self.attempts,
            })
        }
    }

    fn normalize(answer: &str) -> String {
        answer.trim().to_lowercase()
    }
}
