//! Property-based tests for reconciliation
//!
//! Random interleavings of peer messages, own messages and focus changes
//! against the seeded session.

use super::*;
use crate::clock::FixedClock;
use crate::config::SessionConfig;
use crate::model::{ChatEvent, Conversation, ConversationId, Message};
use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use std::sync::Arc;

const ME: &str = "나";
const CONVERSATIONS: [u64; 3] = [1, 2, 3];

// ============================================================================
// Test Helpers
// ============================================================================

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 30, 0, 0, 0).unwrap()
}

fn seeded() -> ChatState {
    ChatState::new(&SessionConfig::default(), Arc::new(FixedClock::new(base())))
}

fn row(state: &ChatState, id: u64) -> Conversation {
    state.directory().get(ConversationId(id)).unwrap().clone()
}

fn log(state: &ChatState, id: u64) -> Vec<Message> {
    state.store().read(ConversationId(id)).to_vec()
}

fn is_sorted(state: &ChatState) -> bool {
    state
        .directory()
        .entries()
        .windows(2)
        .all(|w| w[0].last_activity >= w[1].last_activity)
}

/// Select a conversation and complete its history load from the store
fn open(state: &mut ChatState, id: u64) {
    let effects = reconcile(state, Event::Select { conversation_id: ConversationId(id) }).unwrap();
    let generation = effects
        .iter()
        .find_map(|e| match e {
            Effect::FetchHistory { generation, .. } => Some(*generation),
            _ => None,
        })
        .unwrap();
    let messages = log(state, id);
    reconcile(
        state,
        Event::HistoryLoaded {
            conversation_id: ConversationId(id),
            generation,
            messages,
        },
    )
    .unwrap();
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Peer { conv: u64, minutes: i64 },
    Own { conv: u64, minutes: i64 },
    Select(u64),
    Back,
}

fn arb_conv() -> impl Strategy<Value = u64> {
    prop::sample::select(CONVERSATIONS.to_vec())
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (arb_conv(), 0i64..1440).prop_map(|(conv, minutes)| Op::Peer { conv, minutes }),
        2 => (arb_conv(), 0i64..1440).prop_map(|(conv, minutes)| Op::Own { conv, minutes }),
        2 => arb_conv().prop_map(Op::Select),
        1 => Just(Op::Back),
    ]
}

fn chat_event(conv: u64, author: &str, minutes: i64) -> Event {
    Event::Incoming(ChatEvent::new(
        ConversationId(conv),
        author,
        format!("msg at {minutes}"),
        base() + Duration::minutes(minutes),
    ))
}

/// Apply a message op and check every per-event property
fn check_message(state: &mut ChatState, conv: u64, author: &str, minutes: i64) {
    let focused = state.focus().is_focused(ConversationId(conv));
    let prior_unread = row(state, conv).unread;
    let visible_before = state.focus().visible().len();
    let others: Vec<_> = CONVERSATIONS
        .iter()
        .filter(|&&c| c != conv)
        .map(|&c| (c, row(state, c), log(state, c)))
        .collect();

    reconcile(state, chat_event(conv, author, minutes)).unwrap();

    // Ordering invariant
    assert!(is_sorted(state), "directory out of order");

    // Unread suppression / accumulation
    let after = row(state, conv);
    if author == ME || focused {
        assert_eq!(after.unread, 0);
    } else {
        assert_eq!(after.unread, prior_unread + 1);
    }
    assert_eq!(after.last_activity, base() + Duration::minutes(minutes));

    // Live append while focused
    if focused {
        assert_eq!(state.focus().visible().len(), visible_before + 1);
        assert_eq!(
            state.focus().visible().last(),
            state.store().last(ConversationId(conv))
        );
    } else {
        assert_eq!(state.focus().visible().len(), visible_before);
    }

    // No cross-talk
    for (c, row_before, log_before) in others {
        assert_eq!(row(state, c), row_before);
        assert_eq!(log(state, c), log_before);
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_every_event_preserves_invariants(ops in proptest::collection::vec(arb_op(), 1..40)) {
        let mut state = seeded();
        for op in ops {
            match op {
                Op::Peer { conv, minutes } => check_message(&mut state, conv, "peer", minutes),
                Op::Own { conv, minutes } => check_message(&mut state, conv, ME, minutes),
                Op::Select(conv) => {
                    open(&mut state, conv);
                    prop_assert_eq!(row(&state, conv).unread, 0);
                    prop_assert_eq!(state.focus().visible(), state.store().read(ConversationId(conv)));
                    prop_assert!(is_sorted(&state));
                }
                Op::Back => {
                    reconcile(&mut state, Event::Back).unwrap();
                    prop_assert!(state.focus().visible().is_empty());
                    prop_assert_eq!(state.focus().focused(), None);
                }
            }
        }
    }

    #[test]
    fn prop_focus_load_replaces_visible(
        first in arb_conv(),
        second in arb_conv(),
        live in 0usize..5,
    ) {
        let mut state = seeded();
        open(&mut state, first);
        for i in 0..live {
            reconcile(&mut state, chat_event(first, "peer", i64::try_from(i).unwrap())).unwrap();
        }
        open(&mut state, second);
        prop_assert_eq!(state.focus().visible(), state.store().read(ConversationId(second)));
    }

    #[test]
    fn prop_message_ids_unique_per_conversation(
        ops in proptest::collection::vec((arb_conv(), any::<bool>()), 1..60),
    ) {
        let mut state = seeded();
        for (conv, own) in ops {
            let author = if own { ME } else { "peer" };
            reconcile(&mut state, chat_event(conv, author, 0)).unwrap();
        }
        for conv in CONVERSATIONS {
            let messages = log(&state, conv);
            let ids: std::collections::HashSet<_> = messages.iter().map(|m| m.id.clone()).collect();
            prop_assert_eq!(ids.len(), messages.len());
        }
    }

    #[test]
    fn prop_ownership_is_derived_from_author(author in "[a-z나]{1,4}", conv in arb_conv()) {
        let mut state = seeded();
        reconcile(&mut state, chat_event(conv, &author, 1)).unwrap();
        let last = state.store().last(ConversationId(conv)).unwrap();
        prop_assert_eq!(last.is_own(), author == ME);
    }
}
