use crate::bot;
use crate::bot::handlers::{is_command_text, Command};
use crate::bot::LinkResponder;
use crate::config::Settings;
use crate::liveness;
use crate::metadata::{MetadataProvider, OEmbedClient};
use anyhow::{Context, Result};
use reqwest::Url;
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{error, info, warn};

/// Run the liveness server and the Telegram dispatcher until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the liveness port cannot be bound or the oEmbed
/// endpoint in `settings` is not a valid URL. Nothing is started in that case.
pub async fn run(settings: Arc<Settings>) -> Result<()> {
    let listener = liveness::bind(settings.port)
        .await
        .with_context(|| format!("Failed to bind liveness port {}", settings.port))?;

    let responder = init_responder(&settings)?;
    info!("Link responder initialized.");

    let liveness_task = tokio::spawn(async move {
        if let Err(e) = liveness::serve(listener).await {
            error!("Liveness server stopped: {}", e);
        }
    });

    let bot = Bot::new(settings.bot_token.clone());
    register_commands(&bot).await;

    let handler = setup_handler();

    info!("Bot is running...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![responder])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Dispatcher stopped, shutting down liveness endpoint.");
    liveness_task.abort();
    Ok(())
}

fn init_responder(settings: &Settings) -> Result<LinkResponder> {
    let endpoint = Url::parse(&settings.oembed_endpoint)
        .with_context(|| format!("Invalid oEmbed endpoint: {}", settings.oembed_endpoint))?;
    let client: Arc<dyn MetadataProvider> =
        Arc::new(OEmbedClient::new(endpoint, settings.oembed_timeout()));
    Ok(LinkResponder::new(client))
}

async fn register_commands(bot: &Bot) {
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!("Failed to register bot commands: {}", e);
    }
}

fn setup_handler() -> UpdateHandler<teloxide::RequestError> {
    Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(
            dptree::filter(|msg: Message| msg.text().is_some_and(|t| !is_command_text(t)))
                .endpoint(handle_text),
        )
}

async fn handle_command(bot: Bot, msg: Message, cmd: Command) -> Result<(), teloxide::RequestError> {
    let res = match cmd {
        Command::Start => bot::handlers::start(bot, msg).await,
        Command::Help => bot::handlers::help(bot, msg).await,
    };
    if let Err(e) = res {
        error!("Command error: {}", e);
    }
    respond(())
}

async fn handle_text(
    bot: Bot,
    msg: Message,
    responder: LinkResponder,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = bot::handlers::handle_text(bot, msg, responder).await {
        error!("Text handler error: {}", e);
    }
    respond(())
}
