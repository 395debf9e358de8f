//! ChatWarden Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;
use teloxide::{prelude::*, types::Update};
use teloxide::dispatching::UpdateHandler;
use teloxide::utils::command::BotCommands as TeloxideBotCommands;
use tracing::{error, info, warn};

use ChatWarden::{
    config::Settings,
    utils::logging,
    database::{DatabaseService, connection::create_pool},
    services::ServiceFactory,
    handlers::{
        commands::{help, messages, restrictions, settings as chat_settings, warns},
        handle_chat_member_updated,
    },
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    dotenv::dotenv().ok();
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard keeps the file writer alive until exit.
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting ChatWarden Telegram Bot...");

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = ChatWarden::database::connection::DatabaseConfig {
        url: settings.database.url.clone(),
        max_connections: settings.database.max_connections,
        min_connections: settings.database.min_connections,
        ..Default::default()
    };
    let db_pool = create_pool(&db_config).await?;

    // Run database migrations
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    // Initialize database service
    let database_service = DatabaseService::new(db_pool);

    // Initialize bot and services
    let bot = Bot::new(settings.bot.token.clone());
    let services = Arc::new(ServiceFactory::new(bot.clone(), database_service));

    info!("Setting up bot handlers...");
    let handler = create_handler();

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![services])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd);
        })
        .enable_ctrlc_handler()
        .build();

    info!("ChatWarden bot is ready!");
    dispatcher.dispatch().await;

    info!("ChatWarden bot has been shut down.");

    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use teloxide::dispatching::UpdateFilterExt;

    dptree::entry()
        .branch(
            Update::filter_message().branch(
                dptree::entry()
                    .filter_command::<BotCommand>()
                    .endpoint(handle_command),
            ),
        )
        .branch(Update::filter_callback_query().endpoint(handle_callback))
        .branch(Update::filter_chat_member().endpoint(handle_chat_member))
}

#[derive(TeloxideBotCommands, Clone, Copy)]
#[command(rename_rule = "lowercase", description = "ChatWarden Bot Commands")]
enum BotCommand {
    #[command(description = "Show help information")]
    Help,
    #[command(description = "Ban the target user")]
    Ban,
    #[command(description = "Ban the target user, deleting the replied message")]
    Dban,
    #[command(description = "Ban the target user silently")]
    Sban,
    #[command(description = "Unban the target user")]
    Unban,
    #[command(description = "Kick the target user")]
    Kick,
    #[command(description = "Kick the target user, deleting the replied message")]
    Dkick,
    #[command(description = "Mute the target user")]
    Mute,
    #[command(description = "Mute the target user, deleting the replied message")]
    Dmute,
    #[command(description = "Mute the target user silently")]
    Smute,
    #[command(description = "Unmute the target user")]
    Unmute,
    #[command(description = "Warn the target user")]
    Warn,
    #[command(description = "Warn the target user, deleting the replied message")]
    Dwarn,
    #[command(description = "Warn the target user, deleting the command message")]
    Swarn,
    #[command(description = "Remove the target user's last warning")]
    Rmwarn,
    #[command(description = "Remove all of the target user's warnings")]
    Resetwarn,
    #[command(description = "Show the target user's warns")]
    Warns,
    #[command(description = "Pin the replied message")]
    Pin,
    #[command(description = "Unpin the replied message")]
    Unpin,
    #[command(description = "Change the warn limit")]
    Warnlimit,
    #[command(description = "Set the warn mode")]
    Warnmode,
    #[command(description = "Show the log channel setting")]
    Logchannel,
    #[command(description = "Set the log channel")]
    Setlogchannel,
    #[command(description = "Remove the log channel")]
    Unsetlogchannel,
    #[command(description = "Reload the admin list")]
    Reload,
}

/// Handle bot commands
async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: BotCommand,
    services: Arc<ServiceFactory>,
) -> HandlerResult {
    let services = (*services).clone();

    let result = match cmd {
        BotCommand::Help => help::handle_help(bot.clone(), msg.clone()).await,
        BotCommand::Ban => restrictions::handle_ban(bot.clone(), msg.clone(), services, false, false).await,
        BotCommand::Dban => restrictions::handle_ban(bot.clone(), msg.clone(), services, true, false).await,
        BotCommand::Sban => restrictions::handle_ban(bot.clone(), msg.clone(), services, false, true).await,
        BotCommand::Unban => restrictions::handle_unban(bot.clone(), msg.clone(), services).await,
        BotCommand::Kick => restrictions::handle_kick(bot.clone(), msg.clone(), services, false).await,
        BotCommand::Dkick => restrictions::handle_kick(bot.clone(), msg.clone(), services, true).await,
        BotCommand::Mute => restrictions::handle_mute(bot.clone(), msg.clone(), services, false, false).await,
        BotCommand::Dmute => restrictions::handle_mute(bot.clone(), msg.clone(), services, true, false).await,
        BotCommand::Smute => restrictions::handle_mute(bot.clone(), msg.clone(), services, false, true).await,
        BotCommand::Unmute => restrictions::handle_unmute(bot.clone(), msg.clone(), services).await,
        BotCommand::Warn => warns::handle_warn(bot.clone(), msg.clone(), services, false, false).await,
        BotCommand::Dwarn => warns::handle_warn(bot.clone(), msg.clone(), services, true, false).await,
        BotCommand::Swarn => warns::handle_warn(bot.clone(), msg.clone(), services, false, true).await,
        BotCommand::Rmwarn => warns::handle_rmwarn(bot.clone(), msg.clone(), services).await,
        BotCommand::Resetwarn => warns::handle_resetwarn(bot.clone(), msg.clone(), services).await,
        BotCommand::Warns => warns::handle_warns(bot.clone(), msg.clone(), services).await,
        BotCommand::Pin => messages::handle_pin(bot.clone(), msg.clone(), services).await,
        BotCommand::Unpin => messages::handle_unpin(bot.clone(), msg.clone(), services).await,
        BotCommand::Warnlimit => warns::handle_warnlimit(bot.clone(), msg.clone(), services).await,
        BotCommand::Warnmode => warns::handle_warnmode(bot.clone(), msg.clone(), services).await,
        BotCommand::Logchannel => chat_settings::handle_logchannel(bot.clone(), msg.clone(), services).await,
        BotCommand::Setlogchannel => chat_settings::handle_setlogchannel(bot.clone(), msg.clone(), services).await,
        BotCommand::Unsetlogchannel => chat_settings::handle_unsetlogchannel(bot.clone(), msg.clone(), services).await,
        BotCommand::Reload => chat_settings::handle_reload(bot.clone(), msg.clone(), services).await,
    };

    if let Err(e) = result {
        error!(error = %e, chat_id = msg.chat.id.0, "Error handling command");
        // The requested action failed; report a generic failure in-chat.
        if let Err(e) = bot
            .send_message(msg.chat.id, "Failed to perform the requested action.")
            .await
        {
            warn!(error = %e, "Failed to send failure notice");
        }
        return Err(e.into());
    }

    Ok(())
}

/// Handle callback queries (help topic buttons)
async fn handle_callback(bot: Bot, query: teloxide::types::CallbackQuery) -> HandlerResult {
    if let Err(e) = help::handle_help_callback(bot, query).await {
        error!(error = %e, "Error handling callback query");
        return Err(e.into());
    }
    Ok(())
}

/// Handle chat member updates
async fn handle_chat_member(
    bot: Bot,
    update: teloxide::types::ChatMemberUpdated,
    services: Arc<ServiceFactory>,
) -> HandlerResult {
    let services = (*services).clone();

    if let Err(e) = handle_chat_member_updated(bot, update, services).await {
        error!(error = %e, "Error handling chat member update");
        return Err(e.into());
    }
    Ok(())
}
