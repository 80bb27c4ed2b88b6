use super::state::{QuizSession, SessionPhase};

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    /// 1-based position of the current question.
    pub position: usize,
    pub total: usize,
    pub answered: usize,
    pub marked: usize,
    pub remaining_seconds: u32,
    pub phase: SessionPhase,
}

impl SessionProgress {
    /// Share of the quiz reached so far, as a whole percentage.
    #[must_use]
    pub fn percent_through(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        self.position * 100 / self.total
    }
}

impl QuizSession {
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            position: self.current_index + 1,
            total: self.total_questions(),
            answered: self.answered_count(),
            marked: self.marked_for_review.iter().filter(|m| **m).count(),
            remaining_seconds: self.remaining_seconds,
            phase: self.phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::sessions::state::tests::build_session;

    #[test]
    fn progress_tracks_position_and_counts() {
        let mut session = build_session(4);
        session.select_answer(2).unwrap();
        session.go_next().unwrap();
        session.toggle_mark_for_review().unwrap();

        let progress = session.progress();
        assert_eq!(progress.position, 2);
        assert_eq!(progress.total, 4);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.marked, 1);
        assert_eq!(progress.percent_through(), 50);
    }
}
