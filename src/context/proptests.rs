//! Property-based tests for the navigation stack
//!
//! These tests drive random operation sequences against a mock transport and
//! check that the stack, the store and the chat stay consistent.

use super::*;
use crate::store::MemoryStore;
use crate::testing::{demo_views, DemoData, MockTransport};
use proptest::prelude::*;

const STATES: [&str; 3] = ["main", "settings", "name"];

// ============================================================================
// Test Helpers
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Advance { state: usize, strategy: Option<SendStrategy> },
    Back,
    BackoffUntil { state: usize },
    Finish,
}

fn arb_strategy() -> impl Strategy<Value = Option<SendStrategy>> {
    prop_oneof![
        Just(None),
        Just(Some(SendStrategy::Edit)),
        Just(Some(SendStrategy::New)),
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..STATES.len(), arb_strategy())
            .prop_map(|(state, strategy)| Op::Advance { state, strategy }),
        2 => Just(Op::Back),
        1 => (0..STATES.len()).prop_map(|state| Op::BackoffUntil { state }),
        1 => Just(Op::Finish),
    ]
}

struct World {
    store: Arc<MemoryStore>,
    transport: Arc<MockTransport>,
    conversation: ConversationId,
    ctx: Context<DemoData>,
}

fn world() -> World {
    let store = Arc::new(MemoryStore::new());
    let transport = Arc::new(MockTransport::new());
    let conversation = ConversationId::new("prop");
    let mut ctx = Context::default();
    ctx.attach(Scope {
        conversation: conversation.clone(),
        store: store.clone(),
        transport: transport.clone(),
        views: Arc::new(demo_views()),
        menu: None,
        labels: Arc::new(Labels::default()),
    });
    World {
        store,
        transport,
        conversation,
        ctx,
    }
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

/// Apply one operation and check the per-operation contract
async fn apply(w: &mut World, op: &Op) -> Result<(), TestCaseError> {
    let depth = w.ctx.depth();
    match op {
        Op::Advance { state, strategy } => {
            let target = StateId::new(STATES[*state]);
            let refresh = w.ctx.current_state() == Some(&target);
            let sent = w.transport.sent_count();
            w.ctx.advance(target.clone(), *strategy, None).await.unwrap();
            if refresh {
                prop_assert_eq!(w.ctx.depth(), depth);
                prop_assert_eq!(w.transport.sent_count(), sent);
            } else {
                prop_assert_eq!(w.ctx.depth(), depth + 1);
            }
        }
        Op::Back => {
            let result = w.ctx.back().await;
            if depth == 0 {
                prop_assert!(matches!(result, Err(NavError::EmptyStack)));
            } else {
                prop_assert!(result.is_ok());
                prop_assert_eq!(w.ctx.depth(), depth - 1);
            }
        }
        Op::BackoffUntil { state } => {
            let target = StateId::new(STATES[*state]);
            let in_history = w.ctx.frames().iter().any(|f| f.state == target);
            let result = w.ctx.backoff_until(target.clone()).await;
            if in_history {
                prop_assert!(result.is_ok());
                prop_assert_eq!(w.ctx.current_state(), Some(&target));
            } else {
                prop_assert!(matches!(result, Err(NavError::HistoricalStateNotFound(_))));
                prop_assert_eq!(w.ctx.depth(), 0);
            }
        }
        Op::Finish => {
            w.ctx.finish().await.unwrap();
            prop_assert_eq!(w.ctx.depth(), 0);
        }
    }
    Ok(())
}

/// Invariants that hold between operations
fn check_invariants(w: &World) -> Result<(), TestCaseError> {
    // Store follows the top frame
    let stored = w.store.state_of(&w.conversation);
    prop_assert_eq!(stored.as_ref(), w.ctx.current_state());

    // Every frame's view is still in the chat
    let live = w.transport.live_views();
    for frame in w.ctx.frames() {
        prop_assert!(live.contains(&frame.view), "frame view {} was deleted", frame.view);
    }

    // Exactly the fresh frames own a message; nothing else lingers
    let mut owned: Vec<_> = w
        .ctx
        .frames()
        .iter()
        .filter(|f| f.fresh)
        .map(|f| f.view)
        .collect();
    owned.sort();
    prop_assert_eq!(live, owned);

    // Adjacent frames never repeat a state
    for pair in w.ctx.frames().windows(2) {
        prop_assert_ne!(&pair[0].state, &pair[1].state);
    }
    Ok(())
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_stack_stays_consistent(ops in proptest::collection::vec(arb_op(), 0..30)) {
        block_on(async {
            let mut w = world();
            for op in &ops {
                apply(&mut w, op).await?;
                check_invariants(&w)?;
            }
            Ok::<(), TestCaseError>(())
        })?;
    }

    #[test]
    fn prop_distinct_advances_set_depth(count in 1usize..=3) {
        block_on(async {
            let mut w = world();
            for state in STATES.iter().take(count) {
                w.ctx.advance(*state, None, None).await.unwrap();
            }
            prop_assert_eq!(w.ctx.depth(), count);
            Ok::<(), TestCaseError>(())
        })?;
    }

    #[test]
    fn prop_finish_always_empties(ops in proptest::collection::vec(arb_op(), 0..20)) {
        block_on(async {
            let mut w = world();
            for op in &ops {
                apply(&mut w, op).await?;
            }
            w.ctx.finish().await.unwrap();
            prop_assert_eq!(w.ctx.depth(), 0);
            prop_assert_eq!(w.store.state_of(&w.conversation), None);
            prop_assert!(w.transport.live_views().is_empty());

            let deleted = w.transport.deleted().len();
            w.ctx.finish().await.unwrap();
            prop_assert_eq!(w.transport.deleted().len(), deleted);
            Ok::<(), TestCaseError>(())
        })?;
    }
}
