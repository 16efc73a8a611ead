use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use url::Url;

use crate::{
    cli::{Cli, Command},
    domain::{
        self,
        events::ServerEvent,
        message::{Message, Sender},
        typing_state::now_unix_ms,
    },
    gateway::{self, RestClient},
    infra::{
        self,
        alerts::TerminalAlertSink,
        contracts::{AlertSink, Toast},
        error::AppError,
        secrets::BearerToken,
        stubs::SilentAlertSink,
    },
    realtime::{
        self,
        connection::{ConnectionManager, SessionEvent},
        ws::WsTransport,
    },
    usecases::{
        self, bootstrap,
        notifications::{NotificationCenter, NotificationQuery},
        room_session::RoomSession,
        send_message::SendMessageError,
    },
};

const TOKEN_ENV_VAR: &str = "LOADROOM_TOKEN";
const TYPING_POLL_INTERVAL_MS: u64 = 250;

pub async fn run(cli: Cli) -> Result<()> {
    let context = bootstrap::bootstrap(cli.config.as_deref())?;

    tracing::debug!(
        domain = domain::module_name(),
        realtime = realtime::module_name(),
        gateway = gateway::module_name(),
        usecases = usecases::module_name(),
        infra = infra::module_name(),
        "module boundaries loaded"
    );

    let token = resolve_credential()?;
    let rest_url = Url::parse(&context.config.server.rest_url)
        .with_context(|| format!("invalid rest_url {}", context.config.server.rest_url))?;

    match cli.command {
        Command::Tail { order } => {
            let events_url = Url::parse(&context.config.server.events_url).map_err(|error| {
                AppError::InvalidEventsUrl {
                    url: context.config.server.events_url.clone(),
                    detail: error.to_string(),
                }
            })?;
            run_tail(order, rest_url, events_url, token).await
        }
        Command::Notifications => run_notifications(rest_url, token).await,
    }
}

fn resolve_credential() -> Result<BearerToken, AppError> {
    if let Ok(raw) = std::env::var(TOKEN_ENV_VAR) {
        let token = BearerToken::new(raw);
        if !token.is_empty() {
            return Ok(token);
        }
    }

    let raw = rpassword::prompt_password("Access token: ")
        .map_err(|_| AppError::MissingCredential)?;
    let token = BearerToken::new(raw);
    if token.is_empty() {
        return Err(AppError::MissingCredential);
    }
    Ok(token)
}

async fn run_tail(
    order_id: String,
    rest_url: Url,
    events_url: Url,
    token: BearerToken,
) -> Result<()> {
    let mut connection = ConnectionManager::new(WsTransport::new(events_url));
    connection.connect(&token).await?;

    let alerts = TerminalAlertSink;
    let mut center = NotificationCenter::new(
        RestClient::new(rest_url.clone(), token.clone()),
        TerminalAlertSink,
    );
    let mut session = RoomSession::live(
        order_id,
        terminal_author(),
        RestClient::new(rest_url, token),
        connection,
    );

    if let Err(error) = session.open().await {
        alerts.toast(&Toast {
            title: "Chat".to_owned(),
            body: error.to_string(),
            action: None,
        });
    }
    for message in session.room().messages() {
        print_message(message);
    }
    if session.room().unread_count() > 0 {
        println!("-- {} unread --", session.room().unread_count());
    }
    session.mark_read();

    let mut typing_ticker = tokio::time::interval(Duration::from_millis(TYPING_POLL_INTERVAL_MS));
    let mut stdin_lines = BufReader::new(tokio::io::stdin()).lines();
    let mut typing_line: Option<String> = None;

    loop {
        tokio::select! {
            maybe_event = session.channel_mut().next_event() => {
                match maybe_event {
                    Some(SessionEvent::Server(event)) => {
                        center.apply_event(&event);
                        session.apply_event(&event);
                        if let ServerEvent::NewMessage { order_id, message } = &event {
                            if order_id == session.order_id() {
                                print_message(message);
                            }
                        }
                        render_typing_line(session.presence().label(), &mut typing_line);
                    }
                    Some(SessionEvent::ConnectionLost { reason }) => {
                        eprintln!("[offline] connection lost: {}. Restart to reconnect.", reason);
                        break;
                    }
                    None => break,
                }
            }
            _ = typing_ticker.tick() => {
                session.poll_typing(now_unix_ms());
            }
            line = stdin_lines.next_line() => {
                match line {
                    Ok(Some(text)) => {
                        if text.trim().is_empty() {
                            continue;
                        }
                        session.input_changed(&text, now_unix_ms());
                        if let Err(error) = session.send().await {
                            alerts.toast(&Toast {
                                title: "Send failed".to_owned(),
                                body: send_failure_text(&error).to_owned(),
                                action: None,
                            });
                        }
                    }
                    Ok(None) | Err(_) => break,
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    session.close();
    session.channel_mut().disconnect().await;
    Ok(())
}

async fn run_notifications(rest_url: Url, token: BearerToken) -> Result<()> {
    let mut center = NotificationCenter::new(RestClient::new(rest_url, token), SilentAlertSink);

    center
        .refresh(&NotificationQuery::default())
        .await
        .map_err(|error| anyhow::anyhow!("failed to fetch notifications: {error}"))?;

    if center.feed().is_empty() {
        println!("No notifications.");
        return Ok(());
    }

    for notification in center.feed().items() {
        let marker = if notification.is_unread() { "*" } else { " " };
        println!(
            "{} {} {}: {}",
            marker,
            notification.kind.badge_tag(),
            notification.title,
            notification.body
        );
    }
    if center.has_unread() {
        println!();
        println!("You have unread notifications.");
    }
    Ok(())
}

/// Identity stamped on draft echoes. Live rooms take senders from server
/// payloads, so for the tail command this is only a placeholder.
fn terminal_author() -> Sender {
    Sender {
        id: "terminal".to_owned(),
        email: "terminal@loadroom.local".to_owned(),
    }
}

fn print_message(message: &Message) {
    println!(
        "[{}] {}: {}",
        message.created_at.format("%Y-%m-%d %H:%M"),
        message.sender.email,
        message.display_content()
    );
}

fn render_typing_line(label: Option<String>, previous: &mut Option<String>) {
    if label == *previous {
        return;
    }
    if let Some(text) = &label {
        eprintln!("~ {} ...", text);
    }
    *previous = label;
}

fn send_failure_text(error: &SendMessageError) -> &'static str {
    match error {
        SendMessageError::EmptyBody => "Nothing to send",
        SendMessageError::Unauthorized => "You are not authorized to post in this chat",
        SendMessageError::OrderNotFound => "This order chat no longer exists",
        SendMessageError::TemporarilyUnavailable => "Chat service is unavailable, try again",
        SendMessageError::DataContractViolation => "Server reply could not be read",
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;
    use crate::test_support::env_lock;

    #[test]
    fn credential_is_taken_from_the_environment() {
        let _guard = env_lock();

        env::set_var(TOKEN_ENV_VAR, "from-env-token");
        let token = resolve_credential().expect("credential must resolve");
        env::remove_var(TOKEN_ENV_VAR);

        assert_eq!(token.expose(), "from-env-token");
    }

    #[test]
    fn send_failure_texts_cover_every_error() {
        let errors = [
            SendMessageError::EmptyBody,
            SendMessageError::Unauthorized,
            SendMessageError::OrderNotFound,
            SendMessageError::TemporarilyUnavailable,
            SendMessageError::DataContractViolation,
        ];

        for error in errors {
            assert!(!send_failure_text(&error).is_empty());
        }
    }

    #[test]
    fn typing_line_renders_only_on_change() {
        let mut previous = None;

        render_typing_line(Some("a@x.com is typing".to_owned()), &mut previous);
        assert_eq!(previous.as_deref(), Some("a@x.com is typing"));

        render_typing_line(None, &mut previous);
        assert_eq!(previous, None);
    }
}
