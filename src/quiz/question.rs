use std::fmt;

use rand::Rng;

/// Arithmetic operator of a generated question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub const ALL: [Operator; 4] = [Operator::Add, Operator::Sub, Operator::Mul, Operator::Div];

    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    left: i64,
    operator: Operator,
    right: i64,
    answer: i64,
}

impl Question {
    /// Draws a question from `rng`.
    ///
    /// `+`, `-` and `*` take both operands from `1..=50`. Division builds the
    /// dividend from a divisor and multiplier in `1..=10`, so it is always exact.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let operator = Operator::ALL[rng.gen_range(0..Operator::ALL.len())];

        match operator {
            Operator::Div => {
                let divisor = rng.gen_range(1..=10);
                let multiplier = rng.gen_range(1..=10);
                Self::new(divisor * multiplier, operator, divisor)
            }
            _ => Self::new(rng.gen_range(1..=50), operator, rng.gen_range(1..=50)),
        }
    }

    pub fn random() -> Self {
        Self::generate(&mut rand::thread_rng())
    }

    pub fn new(left: i64, operator: Operator, right: i64) -> Self {
        let answer = match operator {
            Operator::Add => left + right,
            Operator::Sub => left - right,
            Operator::Mul => left * right,
            Operator::Div => left / right,
        };

        Self {
            left,
            operator,
            right,
            answer,
        }
    }

    pub fn left(&self) -> i64 {
        self.left
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn right(&self) -> i64 {
        self.right
    }

    pub fn answer(&self) -> i64 {
        self.answer
    }

    /// Text shown to the student, e.g. `12 * 3 =`.
    pub fn prompt(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} =", self.left, self.operator, self.right)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn division_is_always_exact() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = 0;

        for _ in 0..2000 {
            let question = Question::generate(&mut rng);
            if question.operator() != Operator::Div {
                continue;
            }
            seen += 1;
            assert_eq!(question.left() % question.right(), 0);
            assert!((1..=10).contains(&question.answer()));
            assert!((1..=10).contains(&question.right()));
        }

        assert!(seen > 0);
    }

    #[test]
    fn other_operands_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..2000 {
            let question = Question::generate(&mut rng);
            if question.operator() == Operator::Div {
                continue;
            }
            assert!((1..=50).contains(&question.left()));
            assert!((1..=50).contains(&question.right()));
        }
    }

    #[test]
    fn every_operator_gets_picked() {
        let mut rng = StdRng::seed_from_u64(3);
        let operators: Vec<Operator> = (0..500)
            .map(|_| Question::generate(&mut rng).operator())
            .collect();

        for operator in Operator::ALL {
            assert!(operators.contains(&operator), "{operator} never drawn");
        }
    }

    #[test]
    fn subtraction_may_go_negative() {
        let question = Question::new(3, Operator::Sub, 40);
        assert_eq!(question.answer(), -37);
        assert_eq!(question.prompt(), "3 - 40 =");
    }
}
