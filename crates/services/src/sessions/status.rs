use std::fmt;

use super::state::QuizSession;

/// Display status of a question in the overview matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionStatus {
    AnsweredMarked,
    Answered,
    Marked,
    /// Seen but left unanswered and unmarked.
    Skipped,
    Unvisited,
}

impl QuestionStatus {
    /// Classify one question. Categories are checked in precedence order,
    /// so an answered and marked question is never reported as just one of the two.
    #[must_use]
    pub fn classify(answered: bool, marked: bool, visited: bool) -> Self {
        match (answered, marked) {
            (true, true) => Self::AnsweredMarked,
            (true, false) => Self::Answered,
            (false, true) => Self::Marked,
            (false, false) if visited => Self::Skipped,
            (false, false) => Self::Unvisited,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AnsweredMarked => "answered-marked",
            Self::Answered => "answered",
            Self::Marked => "marked",
            Self::Skipped => "skipped",
            Self::Unvisited => "unvisited",
        }
    }

    /// Legend text for the overview.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::AnsweredMarked => "Answered + Marked",
            Self::Answered => "Answered",
            Self::Marked => "Marked for Review",
            Self::Skipped => "Skipped",
            Self::Unvisited => "Not Visited",
        }
    }
}

impl fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-status tally across all questions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub answered_marked: usize,
    pub answered: usize,
    pub marked: usize,
    pub skipped: usize,
    pub unvisited: usize,
}

impl StatusCounts {
    #[must_use]
    pub fn tally(statuses: &[QuestionStatus]) -> Self {
        statuses.iter().fold(Self::default(), |mut counts, status| {
            match status {
                QuestionStatus::AnsweredMarked => counts.answered_marked += 1,
                QuestionStatus::Answered => counts.answered += 1,
                QuestionStatus::Marked => counts.marked += 1,
                QuestionStatus::Skipped => counts.skipped += 1,
                QuestionStatus::Unvisited => counts.unvisited += 1,
            }
            counts
        })
    }
}

impl QuizSession {
    /// Status of question `index`, derived fresh from the session state.
    ///
    /// Returns `None` for an index outside the quiz.
    #[must_use]
    pub fn status(&self, index: usize) -> Option<QuestionStatus> {
        let answered = self.selected_answers.get(index)?.is_some();
        let marked = *self.marked_for_review.get(index)?;
        let visited = *self.visited.get(index)? || index == self.current_index;
        Some(QuestionStatus::classify(answered, marked, visited))
    }

    /// Status of every question, in quiz order.
    #[must_use]
    pub fn overview(&self) -> Vec<QuestionStatus> {
        (0..self.total_questions())
            .filter_map(|index| self.status(index))
            .collect()
    }

    #[must_use]
    pub fn status_counts(&self) -> StatusCounts {
        StatusCounts::tally(&self.overview())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::state::tests::build_session;

    #[test]
    fn classify_precedence() {
        use QuestionStatus::*;
        assert_eq!(QuestionStatus::classify(true, true, true), AnsweredMarked);
        assert_eq!(QuestionStatus::classify(true, true, false), AnsweredMarked);
        assert_eq!(QuestionStatus::classify(true, false, false), Answered);
        assert_eq!(QuestionStatus::classify(false, true, false), Marked);
        assert_eq!(QuestionStatus::classify(false, false, true), Skipped);
        assert_eq!(QuestionStatus::classify(false, false, false), Unvisited);
    }

    #[test]
    fn fresh_session_overview() {
        let session = build_session(3);
        assert_eq!(
            session.overview(),
            vec![
                QuestionStatus::Skipped,
                QuestionStatus::Unvisited,
                QuestionStatus::Unvisited
            ]
        );
        assert_eq!(session.status(3), None);
    }

    #[test]
    fn answered_and_marked_wins() {
        let mut session = build_session(2);
        session.select_answer(1).unwrap();
        session.toggle_mark_for_review().unwrap();
        assert_eq!(session.status(0), Some(QuestionStatus::AnsweredMarked));
    }

    #[test]
    fn unmarking_reverts_to_prior_status() {
        let mut session = build_session(3);

        // Unanswered: marked -> skipped.
        session.toggle_mark_for_review().unwrap();
        session.apply_pending_advance().unwrap();
        assert_eq!(session.status(0), Some(QuestionStatus::Marked));
        session.go_previous().unwrap();
        session.toggle_mark_for_review().unwrap();
        assert!(!session.marked_for_review()[0]);
        assert_eq!(session.status(0), Some(QuestionStatus::Skipped));

        // Answered: answered-marked -> answered.
        session.jump_to(2).unwrap();
        session.select_answer(0).unwrap();
        session.toggle_mark_for_review().unwrap();
        assert_eq!(session.status(2), Some(QuestionStatus::AnsweredMarked));
        session.toggle_mark_for_review().unwrap();
        assert_eq!(session.status(2), Some(QuestionStatus::Answered));
    }

    #[test]
    fn status_reflects_latest_state() {
        let mut session = build_session(2);
        session.select_answer(0).unwrap();
        assert_eq!(session.status(0), Some(QuestionStatus::Answered));
        session.select_answer(0).unwrap();
        assert_eq!(session.status(0), Some(QuestionStatus::Skipped));
    }

    #[test]
    fn counts_cover_every_question() {
        let mut session = build_session(4);
        session.select_answer(1).unwrap();
        session.go_next().unwrap();
        session.toggle_mark_for_review().unwrap();

        let counts = session.status_counts();
        assert_eq!(
            counts,
            StatusCounts {
                answered_marked: 0,
                answered: 1,
                marked: 1,
                skipped: 0,
                unvisited: 2,
            }
        );
    }
}
