use crate::quiz::{GradeOutcome, Progress, Session};

/// Where a chat stands in the quiz. A finished quiz drops back to `NoSession`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuizState {
    #[default]
    NoSession,
    InProgress {
        question: usize,
        correct: u32,
    },
}

impl From<Option<&Session>> for QuizState {
    fn from(session: Option<&Session>) -> Self {
        match session {
            Some(session) => QuizState::InProgress {
                question: session.current_index(),
                correct: session.correct_count(),
            },
            None => QuizState::NoSession,
        }
    }
}

/// Named edges of the quiz state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// `NoSession -> InProgress(0)`
    Started,
    /// `InProgress(q) -> InProgress(0)`
    Restarted,
    /// Teacher asked for a quiz; no change.
    TeacherRefused,
    /// Unparsable answer; no change.
    Reprompted,
    /// `InProgress(q) -> InProgress(q + 1)`
    Advanced,
    /// `InProgress(9) -> NoSession`
    Completed,
    /// Text that the state machine does not act on.
    Ignored,
}

impl QuizState {
    /// Edge taken on `/quiz`.
    pub fn on_quiz_command(self, from_teacher: bool) -> Transition {
        match (from_teacher, self) {
            (true, _) => Transition::TeacherRefused,
            (false, QuizState::NoSession) => Transition::Started,
            (false, QuizState::InProgress { .. }) => Transition::Restarted,
        }
    }
}

impl From<&GradeOutcome> for Transition {
    fn from(outcome: &GradeOutcome) -> Self {
        match outcome {
            GradeOutcome::Invalid { .. } => Transition::Reprompted,
            GradeOutcome::Graded {
                progress: Progress::Continuing { .. },
                ..
            } => Transition::Advanced,
            GradeOutcome::Graded {
                progress: Progress::Finished { .. },
                ..
            } => Transition::Completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::{Operator, Question, Verdict};

    #[test]
    fn quiz_command_edges() {
        let running = QuizState::InProgress {
            question: 4,
            correct: 2,
        };

        assert_eq!(QuizState::NoSession.on_quiz_command(false), Transition::Started);
        assert_eq!(running.on_quiz_command(false), Transition::Restarted);
        assert_eq!(QuizState::NoSession.on_quiz_command(true), Transition::TeacherRefused);
        assert_eq!(running.on_quiz_command(true), Transition::TeacherRefused);
    }

    #[test]
    fn grade_outcomes_map_to_edges() {
        let question = Question::new(1, Operator::Add, 1);

        let invalid = GradeOutcome::Invalid {
            question: question.clone(),
        };
        let advanced = GradeOutcome::Graded {
            verdict: Verdict::Correct,
            progress: Progress::Continuing {
                next: question,
                position: 2,
            },
        };
        let completed = GradeOutcome::Graded {
            verdict: Verdict::Incorrect { expected: 2 },
            progress: Progress::Finished { correct: 9 },
        };

        assert_eq!(Transition::from(&invalid), Transition::Reprompted);
        assert_eq!(Transition::from(&advanced), Transition::Advanced);
        assert_eq!(Transition::from(&completed), Transition::Completed);
    }
}
