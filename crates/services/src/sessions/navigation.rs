use super::state::QuizSession;
use crate::error::SessionError;

/// Result of toggling the review mark on the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkOutcome {
    /// Question whose mark was flipped.
    pub index: usize,
    /// Mark value after the flip.
    pub marked: bool,
    /// True when an advance to the next question is now pending.
    pub advance_pending: bool,
}

impl QuizSession {
    /// Select `option` on the current question, or clear it if it was already selected.
    ///
    /// Never advances.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after submission and
    /// `SessionError::OptionOutOfRange` for an option the question does not have.
    pub fn select_answer(&mut self, option: usize) -> Result<Option<usize>, SessionError> {
        self.ensure_active()?;
        let options = self
            .current_question()
            .map_or(0, |question| question.options().len());
        if option >= options {
            return Err(SessionError::OptionOutOfRange { option, options });
        }

        let slot = &mut self.selected_answers[self.current_index];
        *slot = if *slot == Some(option) {
            None
        } else {
            Some(option)
        };
        Ok(*slot)
    }

    /// Advance one question. On the last question this only marks it visited;
    /// finishing always goes through an explicit submit.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after submission.
    pub fn go_next(&mut self) -> Result<usize, SessionError> {
        self.ensure_active()?;
        self.pending_advance = None;
        self.visited[self.current_index] = true;
        if self.current_index < self.last_index() {
            self.move_to(self.current_index + 1);
        }
        Ok(self.current_index)
    }

    /// Go back one question; no-op on the first.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after submission.
    pub fn go_previous(&mut self) -> Result<usize, SessionError> {
        self.ensure_active()?;
        self.pending_advance = None;
        if self.current_index > 0 {
            self.move_to(self.current_index - 1);
        }
        Ok(self.current_index)
    }

    /// Jump straight to question `index` (0-based).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::QuestionOutOfRange` without touching the session
    /// when `index` is not a question, and `SessionError::Completed` after submission.
    pub fn jump_to(&mut self, index: usize) -> Result<usize, SessionError> {
        self.ensure_active()?;
        self.check_index(index)?;
        self.pending_advance = None;
        self.visited[self.current_index] = true;
        self.move_to(index);
        Ok(self.current_index)
    }

    /// Flip the review mark on the current question.
    ///
    /// Unless this is the last question, an advance to the next question is
    /// recorded but not applied: the caller shows the flipped mark first and
    /// later calls [`QuizSession::apply_pending_advance`].
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after submission.
    pub fn toggle_mark_for_review(&mut self) -> Result<MarkOutcome, SessionError> {
        self.ensure_active()?;
        let index = self.current_index;
        let marked = !self.marked_for_review[index];
        self.marked_for_review[index] = marked;

        self.pending_advance = if index < self.last_index() {
            Some(index)
        } else {
            None
        };

        Ok(MarkOutcome {
            index,
            marked,
            advance_pending: self.pending_advance.is_some(),
        })
    }

    /// Apply the advance recorded by [`QuizSession::toggle_mark_for_review`].
    ///
    /// Returns `Ok(true)` when the session moved. Any manual navigation since
    /// the mark drops the advance, even one that came back to the marked question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after submission.
    pub fn apply_pending_advance(&mut self) -> Result<bool, SessionError> {
        self.ensure_active()?;
        let Some(from) = self.pending_advance.take() else {
            return Ok(false);
        };
        if from != self.current_index || from >= self.last_index() {
            return Ok(false);
        }

        self.visited[from] = true;
        self.move_to(from + 1);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::state::tests::{assert_lengths, build_session};

    #[test]
    fn select_answer_toggles_off_on_repeat() {
        let mut session = build_session(2);
        assert_eq!(session.select_answer(2).unwrap(), Some(2));
        assert_eq!(session.select_answer(2).unwrap(), None);
        assert_eq!(session.selected_answers()[0], None);
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn select_answer_replaces_other_option() {
        let mut session = build_session(2);
        session.select_answer(1).unwrap();
        assert_eq!(session.select_answer(3).unwrap(), Some(3));
        assert_eq!(session.current_answer(), Some(3));
    }

    #[test]
    fn select_answer_rejects_unknown_option() {
        let mut session = build_session(2);
        let err = session.select_answer(4).unwrap_err();
        assert!(matches!(
            err,
            SessionError::OptionOutOfRange {
                option: 4,
                options: 4
            }
        ));
        assert_eq!(session.selected_answers(), &[None, None]);
    }

    #[test]
    fn go_next_stops_on_last_question() {
        let mut session = build_session(2);
        assert_eq!(session.go_next().unwrap(), 1);
        assert_eq!(session.go_next().unwrap(), 1);
        assert_eq!(session.visited(), &[true, true]);
        assert!(!session.is_completed());
        assert_lengths(&session);
    }

    #[test]
    fn go_previous_stops_on_first_question() {
        let mut session = build_session(3);
        assert_eq!(session.go_previous().unwrap(), 0);
        session.jump_to(2).unwrap();
        assert_eq!(session.go_previous().unwrap(), 1);
        assert_lengths(&session);
    }

    #[test]
    fn jump_to_marks_both_ends_visited() {
        let mut session = build_session(4);
        session.jump_to(3).unwrap();
        assert_eq!(session.current_index(), 3);
        assert_eq!(session.visited(), &[true, false, false, true]);
    }

    #[test]
    fn jump_out_of_range_leaves_state_unchanged() {
        let mut session = build_session(3);
        let err = session.jump_to(5).unwrap_err();
        assert!(matches!(
            err,
            SessionError::QuestionOutOfRange { index: 5, total: 3 }
        ));
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.visited(), &[true, false, false]);
    }

    #[test]
    fn mark_flips_before_advance() {
        let mut session = build_session(3);
        let outcome = session.toggle_mark_for_review().unwrap();
        assert_eq!(
            outcome,
            MarkOutcome {
                index: 0,
                marked: true,
                advance_pending: true
            }
        );
        // The flip is visible while the session still shows the marked question.
        assert_eq!(session.current_index(), 0);
        assert!(session.marked_for_review()[0]);

        assert!(session.apply_pending_advance().unwrap());
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.visited(), &[true, true, false]);
        assert!(!session.apply_pending_advance().unwrap());
    }

    #[test]
    fn mark_on_last_question_does_not_advance() {
        let mut session = build_session(3);
        session.jump_to(2).unwrap();
        let outcome = session.toggle_mark_for_review().unwrap();
        assert!(outcome.marked);
        assert!(!outcome.advance_pending);
        assert!(!session.apply_pending_advance().unwrap());
        assert_eq!(session.current_index(), 2);
    }

    #[test]
    fn double_mark_before_advance_clears_mark() {
        let mut session = build_session(3);
        session.toggle_mark_for_review().unwrap();
        let outcome = session.toggle_mark_for_review().unwrap();
        assert!(!outcome.marked);
        assert!(!session.marked_for_review()[0]);

        assert!(session.apply_pending_advance().unwrap());
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn pending_advance_dropped_after_manual_navigation() {
        let mut session = build_session(4);
        session.toggle_mark_for_review().unwrap();
        session.jump_to(3).unwrap();
        assert!(!session.apply_pending_advance().unwrap());
        assert_eq!(session.current_index(), 3);
    }

    #[test]
    fn pending_advance_dropped_after_leaving_and_returning() {
        let mut session = build_session(3);
        session.toggle_mark_for_review().unwrap();
        session.go_next().unwrap();
        session.go_previous().unwrap();
        assert!(!session.has_pending_advance());
        assert!(!session.apply_pending_advance().unwrap());
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn bounded_navigation_still_drops_advance() {
        let mut session = build_session(3);
        session.toggle_mark_for_review().unwrap();
        assert_eq!(session.go_previous().unwrap(), 0);
        assert!(!session.apply_pending_advance().unwrap());
        assert_eq!(session.current_index(), 0);
    }
}
