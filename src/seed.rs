//! Built-in starting conversations
//!
//! The session and the in-memory transport both start from this list so that
//! a freshly opened conversation shows the same history the directory
//! summarises.

use crate::model::{ConversationId, Message, MessageId};
use chrono::{DateTime, FixedOffset, TimeZone, Utc};

/// Directory row before the time label is rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedConversation {
    pub id: ConversationId,
    pub peer_name: &'static str,
    pub preview: &'static str,
    pub last_activity: DateTime<Utc>,
    pub unread: u32,
}

pub fn conversations() -> Vec<SeedConversation> {
    vec![
        SeedConversation {
            id: ConversationId(1),
            peer_name: "엄준식",
            preview: "저 살아있어요",
            last_activity: kst(14, 30),
            unread: 2,
        },
        SeedConversation {
            id: ConversationId(2),
            peer_name: "임기철",
            preview: "Make GIST Great Again",
            last_activity: kst(13, 15),
            unread: 1,
        },
        SeedConversation {
            id: ConversationId(3),
            peer_name: "Naelon Melon Musk",
            preview: "Buy DOGE",
            last_activity: kst(11, 20),
            unread: 0,
        },
    ]
}

/// Message history per conversation, ownership resolved against `local_user`
pub fn logs(local_user: &str) -> Vec<(ConversationId, Vec<Message>)> {
    let lines: [(u64, &[(&str, &str, u32, u32)]); 2] = [
        (
            1,
            &[
                ("엄준식", "엄", 14, 25),
                ("", "준", 14, 26),
                ("엄준식", "식", 14, 28),
                ("", "은", 14, 29),
                ("엄준식", "살아있다", 14, 30),
            ],
        ),
        (
            2,
            &[
                ("", "앞으로의 계획은?", 13, 10),
                ("임기철", "Make GIST Great Again", 13, 15),
            ],
        ),
    ];

    lines
        .iter()
        .map(|(conv, rows)| {
            let messages = rows
                .iter()
                .enumerate()
                .map(|(i, (author, body, hour, minute))| {
                    // Empty author marks a line written by the local user
                    let author = if author.is_empty() { local_user } else { *author };
                    Message::new(
                        MessageId(format!("seed-{conv}-{}", i + 1)),
                        author,
                        *body,
                        kst(*hour, *minute),
                        local_user,
                    )
                })
                .collect();
            (ConversationId(*conv), messages)
        })
        .collect()
}

fn kst(hour: u32, minute: u32) -> DateTime<Utc> {
    FixedOffset::east_opt(9 * 3600)
        .and_then(|offset| offset.with_ymd_and_hms(2025, 5, 30, hour, minute, 0).single())
        .map_or(DateTime::<Utc>::MIN_UTC, |t| t.with_timezone(&Utc))
}
