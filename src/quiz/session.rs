use rand::Rng;
use teloxide::types::ChatId;

use super::question::Question;

pub const QUESTIONS_PER_QUIZ: usize = 10;

/// Progress of one chat through a quiz.
#[derive(Debug, Clone)]
pub struct Session {
    chat_id: ChatId,
    current: usize,
    correct: u32,
    questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect { expected: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// `position` is 1-based.
    Continuing { next: Question, position: usize },
    Finished { correct: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradeOutcome {
    /// Input was not a number; the session did not move.
    Invalid { question: Question },
    Graded { verdict: Verdict, progress: Progress },
}

impl GradeOutcome {
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            GradeOutcome::Graded {
                progress: Progress::Finished { .. },
                ..
            }
        )
    }
}

impl Session {
    pub fn new(chat_id: ChatId, questions: Vec<Question>) -> Self {
        Self {
            chat_id,
            current: 0,
            correct: 0,
            questions,
        }
    }

    pub fn generate<R: Rng + ?Sized>(chat_id: ChatId, rng: &mut R) -> Self {
        let questions = (0..QUESTIONS_PER_QUIZ)
            .map(|_| Question::generate(rng))
            .collect();
        Self::new(chat_id, questions)
    }

    /// Ten fresh questions from the thread-local generator.
    pub fn random(chat_id: ChatId) -> Self {
        let questions = (0..QUESTIONS_PER_QUIZ).map(|_| Question::random()).collect();
        Self::new(chat_id, questions)
    }

    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn correct_count(&self) -> u32 {
        self.correct
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.questions.len()
    }

    /// Grades `raw` against the current question. `None` once every question is answered.
    pub fn grade(&mut self, raw: &str) -> Option<GradeOutcome> {
        let question = self.current_question()?.clone();

        let Some(given) = parse_answer(raw) else {
            return Some(GradeOutcome::Invalid { question });
        };

        let verdict = if given == question.answer() as f64 {
            self.correct += 1;
            Verdict::Correct
        } else {
            Verdict::Incorrect {
                expected: question.answer(),
            }
        };
        self.current += 1;

        let progress = match self.questions.get(self.current) {
            Some(next) => Progress::Continuing {
                next: next.clone(),
                position: self.current + 1,
            },
            None => Progress::Finished {
                correct: self.correct,
            },
        };

        Some(GradeOutcome::Graded { verdict, progress })
    }
}

/// Reads the longest number at the start of `raw`, so `4 apples` reads as 4.
/// Input without a leading number and non-finite values give `None`.
pub fn parse_answer(raw: &str) -> Option<f64> {
    let text = raw.trim_start();
    let bytes = text.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_digits = leading_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = leading_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exp_digits = leading_digits(&bytes[exponent..]);
        if exp_digits > 0 {
            end = exponent + exp_digits;
        }
    }

    text[..end]
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

fn leading_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::quiz::question::Operator;

    fn fixed_session() -> Session {
        let questions = (1..=QUESTIONS_PER_QUIZ as i64)
            .map(|n| Question::new(n, Operator::Add, 1))
            .collect();
        Session::new(ChatId(111), questions)
    }

    #[test]
    fn generated_session_starts_at_zero_with_ten_questions() {
        let session = Session::generate(ChatId(5), &mut StdRng::seed_from_u64(1));
        assert_eq!(session.questions().len(), QUESTIONS_PER_QUIZ);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.correct_count(), 0);
    }

    #[test]
    fn random_session_has_ten_questions() {
        let session = Session::random(ChatId(6));
        assert_eq!(session.chat_id(), ChatId(6));
        assert_eq!(session.questions().len(), QUESTIONS_PER_QUIZ);
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn correct_answer_advances_and_scores() {
        let mut session = fixed_session();
        let outcome = session.grade("2");

        assert_eq!(
            outcome,
            Some(GradeOutcome::Graded {
                verdict: Verdict::Correct,
                progress: Progress::Continuing {
                    next: Question::new(2, Operator::Add, 1),
                    position: 2,
                },
            })
        );
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.correct_count(), 1);
    }

    #[test]
    fn wrong_answer_advances_and_reports_expected() {
        let mut session = fixed_session();
        let outcome = session.grade("100");

        assert!(matches!(
            outcome,
            Some(GradeOutcome::Graded {
                verdict: Verdict::Incorrect { expected: 2 },
                ..
            })
        ));
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.correct_count(), 0);
    }

    #[test]
    fn non_numeric_input_leaves_session_untouched() {
        let mut session = fixed_session();
        session.grade("2");

        for raw in ["abc", "", "  ", "nan", "inf", "two", "-", ".", "e5", "x4", "1e999"] {
            let outcome = session.grade(raw);
            assert_eq!(
                outcome,
                Some(GradeOutcome::Invalid {
                    question: Question::new(2, Operator::Add, 1)
                })
            );
        }
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.correct_count(), 1);
    }

    #[test]
    fn trailing_text_after_a_number_is_ignored() {
        let mut session = fixed_session();

        for raw in ["2 apples", "3!", " 4)", "5.0kg", "+6 ok"] {
            assert!(
                matches!(
                    session.grade(raw),
                    Some(GradeOutcome::Graded {
                        verdict: Verdict::Correct,
                        ..
                    })
                ),
                "{raw:?} should grade as correct"
            );
        }
        assert_eq!(session.current_index(), 5);
        assert_eq!(session.correct_count(), 5);
    }

    #[test]
    fn leading_number_prefix_is_read() {
        assert_eq!(parse_answer("4 apples"), Some(4.0));
        assert_eq!(parse_answer("  -12!"), Some(-12.0));
        assert_eq!(parse_answer(".5)"), Some(0.5));
        assert_eq!(parse_answer("7."), Some(7.0));
        assert_eq!(parse_answer("2e1x"), Some(20.0));
        assert_eq!(parse_answer("3e"), Some(3.0));
        assert_eq!(parse_answer("3e+"), Some(3.0));
        assert_eq!(parse_answer("apples 4"), None);
    }

    #[test]
    fn decimal_and_padded_answers_are_compared_exactly() {
        let mut session = fixed_session();
        assert!(matches!(
            session.grade(" 2.0 "),
            Some(GradeOutcome::Graded {
                verdict: Verdict::Correct,
                ..
            })
        ));
        assert!(matches!(
            session.grade("3.5"),
            Some(GradeOutcome::Graded {
                verdict: Verdict::Incorrect { expected: 3 },
                ..
            })
        ));
    }

    #[test]
    fn tenth_answer_finishes_with_matching_count() {
        let mut session = fixed_session();
        let mut last = None;

        for n in 1..=QUESTIONS_PER_QUIZ as i64 {
            let answer = if n % 2 == 1 { n + 1 } else { 0 };
            last = session.grade(&answer.to_string());
        }

        assert_eq!(
            last,
            Some(GradeOutcome::Graded {
                verdict: Verdict::Incorrect { expected: 11 },
                progress: Progress::Finished { correct: 5 },
            })
        );
        assert!(session.is_finished());
        assert_eq!(session.current_index(), QUESTIONS_PER_QUIZ);
        assert_eq!(session.grade("1"), None);
    }
}
