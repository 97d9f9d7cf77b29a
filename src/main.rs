//! duopane demo
//!
//! Line-driven front end over stdin/stdout for a seeded in-memory session.
//! Logs go to stderr as JSON.

use duopane::{
    spawn_session, ChatEvent, Clock, ConversationId, InMemoryTransport, RenderEvent,
    SessionConfig, SessionHandle, SessionSnapshot, SystemClock,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const FALLBACK_PEER: &str = "상대방";
const PING_BODY: &str = "새로운 메시지입니다";
const OTHER_BODY: &str = "다른 채팅방의 새로운 메시지";

const HELP: &str = "\
commands:
  /open <id>   open a conversation
  /back        close the open conversation
  /ping        receive a message in the open conversation
  /other       receive a message in the most recent other conversation
  /list        show the conversation list
  /json        dump the session snapshot as JSON
  /quit        exit
anything else is sent to the open conversation";

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Open(ConversationId),
    Back,
    Ping,
    Other,
    List,
    Json,
    Help,
    Quit,
    Send(String),
    Invalid(String),
}

fn parse_input(line: &str) -> Option<Input> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let Some(command) = trimmed.strip_prefix('/') else {
        return Some(Input::Send(line.to_string()));
    };
    let mut parts = command.split_whitespace();
    let input = match (parts.next(), parts.next()) {
        (Some("open"), Some(id)) => match id.parse::<u64>() {
            Ok(id) => Input::Open(ConversationId(id)),
            Err(_) => Input::Invalid(format!("not a conversation id: {id}")),
        },
        (Some("open"), None) => Input::Invalid("usage: /open <id>".to_string()),
        (Some("back"), _) => Input::Back,
        (Some("ping"), _) => Input::Ping,
        (Some("other"), _) => Input::Other,
        (Some("list"), _) => Input::List,
        (Some("json"), _) => Input::Json,
        (Some("help"), _) => Input::Help,
        (Some("quit" | "exit"), _) => Input::Quit,
        _ => Input::Invalid(format!("unknown command: {trimmed}")),
    };
    Some(input)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "duopane=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = SessionConfig::from_env();
    tracing::info!(
        local_user = %config.local_user,
        locale = ?config.locale,
        utc_offset = %config.utc_offset,
        "Starting session"
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let transport = Arc::new(InMemoryTransport::seeded(
        config.local_user.clone(),
        Arc::clone(&clock),
    ));
    let (session, runtime) = spawn_session(&config, Arc::clone(&transport), clock);

    let printer = tokio::spawn(print_renders(session.subscribe()));

    print_directory(&session.snapshot().await?);
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(input) = parse_input(&line) else {
            continue;
        };
        match input {
            Input::Quit => break,
            Input::Help => println!("{HELP}"),
            Input::Invalid(reason) => println!("! {reason}"),
            Input::List => {
                session.refresh_labels().await?;
                print_directory(&session.snapshot().await?);
            }
            Input::Json => println!("{}", serde_json::to_string_pretty(&session.snapshot().await?)?),
            Input::Open(id) => {
                if let Err(e) = session.select(id).await {
                    println!("! {e}");
                }
            }
            Input::Back => session.back().await?,
            Input::Send(text) => match session.send(text).await {
                Ok(message) => tracing::debug!(message_id = %message.id, "Sent"),
                Err(e) => println!("! send failed: {e}"),
            },
            Input::Ping => {
                let snapshot = session.snapshot().await?;
                match snapshot.focused {
                    Some(id) => simulate_peer(&session, &transport, &snapshot, id, PING_BODY).await,
                    None => println!("! open a conversation first"),
                }
            }
            Input::Other => {
                let snapshot = session.snapshot().await?;
                match snapshot.conversations.iter().find(|c| !c.focused) {
                    Some(other) => {
                        let id = other.id;
                        simulate_peer(&session, &transport, &snapshot, id, OTHER_BODY).await;
                    }
                    None => println!("! no other conversation"),
                }
            }
        }
    }

    drop(session);
    runtime.await?;
    printer.abort();
    Ok(())
}

/// Have the conversation's peer write `body`, then hand it to the session
async fn simulate_peer(
    session: &SessionHandle,
    transport: &InMemoryTransport,
    snapshot: &SessionSnapshot,
    id: ConversationId,
    body: &str,
) {
    let peer = snapshot
        .conversations
        .iter()
        .find(|c| c.id == id)
        .map_or(FALLBACK_PEER, |c| c.peer_name.as_str());
    let message = transport.deliver_from_peer(id, peer, body);
    if let Err(e) = session.receive(ChatEvent::from_message(id, &message)).await {
        println!("! {e}");
    }
}

async fn print_renders(mut renders: tokio::sync::broadcast::Receiver<RenderEvent>) {
    use tokio::sync::broadcast::error::RecvError;
    loop {
        match renders.recv().await {
            Ok(event) => print_render(&event),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Render output fell behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

fn print_render(event: &RenderEvent) {
    match event {
        RenderEvent::Directory {
            conversations,
            total_unread,
        } => {
            println!("-- conversations ({total_unread} unread)");
            for c in conversations {
                let marker = if c.focused { '>' } else { ' ' };
                let badge = if c.unread > 0 {
                    format!(" [{}]", c.unread)
                } else {
                    String::new()
                };
                println!(
                    "{marker} {:>3} {} {}{badge}  {}",
                    c.id.0, c.peer_name, c.time, c.preview
                );
            }
        }
        RenderEvent::Focus { focused, loading } => match focused {
            Some(id) if *loading => println!("-- opening {id}..."),
            Some(id) => println!("-- {id} open"),
            None => println!("-- pick a conversation"),
        },
        RenderEvent::History {
            conversation_id,
            messages,
        } => {
            println!("-- history of {conversation_id}");
            for m in messages {
                print_message(&m.author, &m.body, &m.time, m.is_own);
            }
        }
        RenderEvent::Appended { message, .. } => {
            print_message(&message.author, &message.body, &message.time, message.is_own);
        }
        RenderEvent::HistoryFailed {
            conversation_id,
            error,
        } => println!("! could not load {conversation_id}: {error}"),
        RenderEvent::SendFailed { draft, error, .. } => {
            println!("! not sent ({error}); draft kept: {draft}");
        }
        RenderEvent::DraftCleared => {}
    }
}

fn print_message(author: &str, body: &str, time: &str, is_own: bool) {
    if is_own {
        println!("{body:>40}  {time}");
    } else {
        println!("{author}: {body}  {time}");
    }
}

fn print_directory(snapshot: &SessionSnapshot) {
    print_render(&RenderEvent::Directory {
        conversations: snapshot.conversations.clone(),
        total_unread: snapshot.total_unread,
    });
}
