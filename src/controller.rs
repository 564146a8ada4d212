use std::error::Error;

use teloxide::{types::ChatId, utils::command::BotCommands};
use tracing::instrument;

use crate::{
    commands::{help_text, Command},
    database::connection::StudentRegistry,
    observer::{MessageObserver, TeacherMirror},
    quiz::{GradeOutcome, Progress, Question, SessionStore, Verdict, QUESTIONS_PER_QUIZ},
    state::{QuizState, Transition},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Command(Command),
    /// Any text that is not one of the recognized commands.
    Text(String),
}

impl Event {
    /// Classifies an incoming text by its first word. Recognized commands may
    /// carry arguments (`/start now`); a command addressed to another bot
    /// (`/quiz@OtherBot`) stays plain text.
    pub fn from_text(text: &str, bot_name: &str) -> Self {
        let head = text.split_whitespace().next().unwrap_or_default();

        match Command::parse(head, bot_name) {
            Ok(command) => Event::Command(command),
            Err(_) => Event::Text(text.to_owned()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    pub chat_id: ChatId,
    pub sender_name: String,
    pub event: Event,
}

impl Inbound {
    pub fn new(chat_id: ChatId, sender_name: impl Into<String>, event: Event) -> Self {
        Self {
            chat_id,
            sender_name: sender_name.into(),
            event,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub chat_id: ChatId,
    pub text: String,
}

impl Reply {
    pub fn new(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
        }
    }
}

/// Result of one event: the quiz edge it took, if any, and the texts to send.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dispatched {
    pub transition: Option<Transition>,
    pub replies: Vec<Reply>,
}

impl Dispatched {
    fn quiz(transition: Transition, replies: Vec<Reply>) -> Self {
        Self {
            transition: Some(transition),
            replies,
        }
    }

    fn plain(replies: Vec<Reply>) -> Self {
        Self {
            transition: None,
            replies,
        }
    }
}

pub type DispatchResult = Result<Dispatched, Box<dyn Error + Send + Sync>>;

/// Drives registration and the per-chat quiz, turning inbound events into replies.
pub struct SessionController<R> {
    store: SessionStore,
    registry: R,
    teacher: Option<ChatId>,
    observers: Vec<Box<dyn MessageObserver>>,
}

impl<R: StudentRegistry> SessionController<R> {
    pub fn new(registry: R, teacher: Option<ChatId>) -> Self {
        Self::with_store(SessionStore::new(), registry, teacher)
    }

    pub fn with_store(store: SessionStore, registry: R, teacher: Option<ChatId>) -> Self {
        Self {
            store,
            registry,
            teacher,
            observers: vec![Box::new(TeacherMirror::new(teacher))],
        }
    }

    pub fn with_observer(mut self, observer: impl MessageObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub async fn state(&self, chat_id: ChatId) -> Result<QuizState, Box<dyn Error + Send + Sync>> {
        Ok(QuizState::from(self.store.get(chat_id).await?.as_ref()))
    }

    fn is_teacher(&self, chat_id: ChatId) -> bool {
        self.teacher == Some(chat_id)
    }

    #[instrument(level = "info", skip(self), fields(chat = inbound.chat_id.0))]
    pub async fn dispatch(&self, inbound: &Inbound) -> DispatchResult {
        let mut dispatched = match &inbound.event {
            Event::Command(Command::Start) => Dispatched::plain(self.register(inbound).await?),
            Event::Command(Command::Quiz) => self.start_quiz(inbound.chat_id).await?,
            Event::Command(Command::Help) => {
                Dispatched::plain(vec![Reply::new(inbound.chat_id, help_text())])
            }
            Event::Text(text) => self.answer(inbound.chat_id, text).await?,
        };

        if let Some(transition) = dispatched.transition {
            log::info!("{}: {:?}", inbound.chat_id.0, transition);
        }

        dispatched.replies.extend(
            self.observers
                .iter()
                .filter_map(|observer| observer.observe(inbound)),
        );

        Ok(dispatched)
    }

    async fn register(&self, inbound: &Inbound) -> Result<Vec<Reply>, Box<dyn Error + Send + Sync>> {
        let chat_id = inbound.chat_id;

        if self.is_teacher(chat_id) {
            return Ok(vec![Reply::new(
                chat_id,
                "You are the teacher! Students take the quiz with /quiz and their messages are forwarded to you here.",
            )]);
        }

        if let Some(student) = self.registry.find_by_chat_id(chat_id.0).await? {
            log::info!("{} is already registered", student);
            return Ok(vec![Reply::new(
                chat_id,
                "You are already registered! Send /quiz to start the test.",
            )]);
        }

        let student = self
            .registry
            .create(chat_id.0, inbound.sender_name.clone())
            .await?;
        log::info!("Registered student {}", student);

        let mut replies = vec![Reply::new(
            chat_id,
            "You have registered successfully! 🎉\nSend /quiz to start the math test. See /help for more.",
        )];
        if let Some(teacher) = self.teacher {
            replies.push(Reply::new(
                teacher,
                format!("Student {} joined", student.display_name()),
            ));
        }

        Ok(replies)
    }

    async fn start_quiz(&self, chat_id: ChatId) -> DispatchResult {
        let transition = self
            .state(chat_id)
            .await?
            .on_quiz_command(self.is_teacher(chat_id));

        let reply = match transition {
            Transition::TeacherRefused => Reply::new(
                chat_id,
                "You are the teacher, the quiz is for students only.",
            ),
            _ => {
                let first = self.store.start_session(chat_id).await?;
                Reply::new(chat_id, quiz_started_text(&first))
            }
        };

        Ok(Dispatched::quiz(transition, vec![reply]))
    }

    async fn answer(&self, chat_id: ChatId, text: &str) -> DispatchResult {
        if text.starts_with('/') {
            log::debug!("{}: ignoring unknown command {:?}", chat_id.0, text);
            return Ok(Dispatched::quiz(Transition::Ignored, vec![]));
        }

        let outcome = match self.state(chat_id).await? {
            QuizState::NoSession => None,
            QuizState::InProgress { .. } => self.store.grade(chat_id, text).await?,
        };
        let Some(outcome) = outcome else {
            return Ok(Dispatched::quiz(Transition::Ignored, vec![]));
        };

        let transition = Transition::from(&outcome);
        let replies = match outcome {
            GradeOutcome::Invalid { question } => vec![Reply::new(
                chat_id,
                format!(
                    "⚠️ Please send a number only (for example, 4). Try again:\n{}",
                    question
                ),
            )],
            GradeOutcome::Graded { verdict, progress } => {
                let feedback = match verdict {
                    Verdict::Correct => "Correct! ✅".to_owned(),
                    Verdict::Incorrect { expected } => {
                        format!("Incorrect! ❌ The correct answer is {}", expected)
                    }
                };

                let follow_up = match progress {
                    Progress::Continuing { next, position } => format!(
                        "Next question ({}/{}):\n{}",
                        position, QUESTIONS_PER_QUIZ, next
                    ),
                    Progress::Finished { correct } => format!(
                        "Test finished! 🎉 You answered {}/{} questions correctly.\nSend /quiz to take it again.",
                        correct, QUESTIONS_PER_QUIZ
                    ),
                };

                vec![Reply::new(chat_id, feedback), Reply::new(chat_id, follow_up)]
            }
        };

        Ok(Dispatched::quiz(transition, replies))
    }
}

fn quiz_started_text(first: &Question) -> String {
    format!(
        "Math test started! 📝 There will be {} questions.\nAnswer with a number only (for example, 4).\nFirst question:\n{}",
        QUESTIONS_PER_QUIZ, first
    )
}
