use std::{borrow::Cow, error::Error, sync::Arc};

use mathquizbot::{
    commands::Command, config::Config, controller::SessionController,
    database::connection::Connection, schema::schema,
};
use teloxide::{
    error_handlers::LoggingErrorHandler,
    prelude::*,
    update_listeners::webhooks::{self, Options},
    utils::command::BotCommands,
};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_level))
        .json()
        .with_span_events(FmtSpan::ENTER)
        .with_line_number(true)
        .with_target(false)
        .init();

    if config.teacher.is_none() {
        log::warn!("TEACHER_ID is not set, teacher notifications are disabled");
    }

    let connection = Connection::connect(Cow::Borrowed(config.database_url.as_str())).await?;
    connection.run_migrations().await?;

    let bot = Bot::new(&config.token);
    bot.set_my_commands(Command::bot_commands()).await?;
    log::info!("Starting bot...");

    let controller = Arc::new(SessionController::new(connection, config.teacher));

    let mut dispatcher = Dispatcher::builder(bot.clone(), schema::<Connection>())
        .dependencies(dptree::deps![controller])
        .enable_ctrlc_handler()
        .build();

    match config.webhook {
        Some(webhook) => {
            log::info!("Listening for updates on {}", webhook.addr);
            let listener = webhooks::axum(bot, Options::new(webhook.addr, webhook.url)).await?;
            dispatcher
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the update listener"),
                )
                .await
        }
        None => dispatcher.dispatch().await,
    }

    Ok(())
}
