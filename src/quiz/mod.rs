pub mod question;
pub mod session;
pub mod store;

pub use question::{Operator, Question};
pub use session::{GradeOutcome, Progress, Session, Verdict, QUESTIONS_PER_QUIZ};
pub use store::SessionStore;
