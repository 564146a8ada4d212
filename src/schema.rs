use std::sync::Arc;

use teloxide::{
    dispatching::{UpdateFilterExt, UpdateHandler},
    dptree,
    prelude::Requester,
    types::{ChatId, Me, Message, Update},
    Bot,
};
use tracing::instrument;

use crate::{
    controller::{Event, Inbound, Reply, SessionController},
    database::connection::StudentRegistry,
    HandlerResult,
};

pub fn schema<R>() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>>
where
    R: StudentRegistry + 'static,
{
    Update::filter_message()
        .branch(dptree::filter(|msg: Message| msg.text().is_some()).endpoint(on_message::<R>))
}

/// Identity and display name of whoever wrote the message. The chat stands in
/// only when the message has no sender.
pub fn resolve_sender(
    from: Option<(ChatId, &str)>,
    chat_id: ChatId,
    chat_name: Option<&str>,
) -> (ChatId, String) {
    match from {
        Some((id, name)) => (id, name.to_owned()),
        None => (chat_id, chat_name.unwrap_or("student").to_owned()),
    }
}

fn inbound(msg: &Message, event: Event) -> Inbound {
    let from = msg
        .from
        .as_ref()
        .map(|user| (ChatId::from(user.id), user.first_name.as_str()));
    let (sender, name) = resolve_sender(from, msg.chat.id, msg.chat.first_name());
    Inbound::new(sender, name, event)
}

#[instrument(level = "info", skip(bot, msg, me, controller), fields(chat = msg.chat.id.0))]
async fn on_message<R: StudentRegistry>(
    bot: Bot,
    msg: Message,
    me: Me,
    controller: Arc<SessionController<R>>,
) -> HandlerResult {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let event = Event::from_text(text, me.username());
    let dispatched = controller.dispatch(&inbound(&msg, event)).await?;
    deliver(&bot, dispatched.replies).await
}

async fn deliver(bot: &Bot, replies: Vec<Reply>) -> HandlerResult {
    for reply in replies {
        bot.send_message(reply.chat_id, reply.text).await?;
    }
    Ok(())
}
