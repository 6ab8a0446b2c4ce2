use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use proptest::prelude::*;
use tokio::sync::oneshot;

use steexp_explorer::{AccountExplorer, AccountLoader, AnchorRegistry, LoadState, Screen};
use steexp_horizon::AccountRecordFetcher;
use steexp_types::{AccountRecord, AnchorEntry, Balance, FetchError, FetchResult, FlagSet, Thresholds};

/// Fetcher whose calls block until the test releases them, in any order
#[derive(Default)]
struct ScriptedFetcher {
    calls: Mutex<Vec<String>>,
    waiting: Mutex<Vec<(String, oneshot::Sender<FetchResult<AccountRecord>>)>>,
}

impl ScriptedFetcher {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn pending(&self) -> Vec<String> {
        self.waiting.lock().iter().map(|(id, _)| id.clone()).collect()
    }

    /// Let spawned fetch tasks reach the fetcher
    async fn wait_for_calls(&self, n: usize) {
        for _ in 0..1000 {
            if self.calls.lock().len() >= n {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("expected {} fetch calls, saw {:?}", n, self.calls());
    }

    fn resolve(&self, account_id: &str, result: FetchResult<AccountRecord>) {
        let sender = {
            let mut waiting = self.waiting.lock();
            let idx = waiting
                .iter()
                .position(|(id, _)| id == account_id)
                .unwrap_or_else(|| panic!("no pending fetch for {}", account_id));
            waiting.remove(idx).1
        };
        let _ = sender.send(result);
    }
}

#[async_trait]
impl AccountRecordFetcher for ScriptedFetcher {
    async fn fetch(&self, account_id: &str) -> FetchResult<AccountRecord> {
        let (tx, rx) = oneshot::channel();
        self.calls.lock().push(account_id.to_string());
        self.waiting.lock().push((account_id.to_string(), tx));
        rx.await
            .unwrap_or_else(|_| Err(FetchError::transport("test fetcher dropped")))
    }
}

/// Fetcher that panics on its first call for each listed id, then answers
struct PanickingFetcher {
    panic_once: Mutex<Vec<String>>,
    calls: Mutex<Vec<String>>,
}

impl PanickingFetcher {
    fn panicking_on(ids: &[&str]) -> Self {
        Self {
            panic_once: Mutex::new(ids.iter().map(|id| id.to_string()).collect()),
            calls: Mutex::default(),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl AccountRecordFetcher for PanickingFetcher {
    async fn fetch(&self, account_id: &str) -> FetchResult<AccountRecord> {
        self.calls.lock().push(account_id.to_string());
        let should_panic = {
            let mut ids = self.panic_once.lock();
            let before = ids.len();
            ids.retain(|id| id != account_id);
            ids.len() != before
        };
        if should_panic {
            panic!("fetcher blew up for {}", account_id);
        }
        Ok(record(account_id))
    }
}

fn record(id: &str) -> AccountRecord {
    AccountRecord {
        id: id.to_string(),
        balances: vec![Balance::native("10.0000000")],
        signers: vec![],
        thresholds: Thresholds::default(),
        flags: FlagSet::new(),
    }
}

fn not_found(id: &str) -> FetchError {
    FetchError::NotFound {
        account_id: id.to_string(),
    }
}

fn loader() -> (Arc<ScriptedFetcher>, AccountLoader) {
    let fetcher = Arc::new(ScriptedFetcher::default());
    let loader = AccountLoader::new(fetcher.clone());
    (fetcher, loader)
}

async fn drain() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

fn ready_id(state: &LoadState) -> Option<&str> {
    state.record().map(|r| r.id.as_str())
}

#[tokio::test]
async fn test_starts_idle() {
    let (fetcher, loader) = loader();
    assert_eq!(loader.current_state(), LoadState::Idle);
    assert_eq!(loader.settled().await, LoadState::Idle);
    assert!(fetcher.calls().is_empty());
}

#[tokio::test]
async fn test_show_loads_account() {
    let (fetcher, loader) = loader();

    loader.show("GABC");
    match loader.current_state() {
        LoadState::Loading { account_id, token } => {
            assert_eq!(account_id, "GABC");
            assert_eq!(token.value(), 1);
        }
        other => panic!("expected loading, got {:?}", other),
    }

    fetcher.wait_for_calls(1).await;
    fetcher.resolve("GABC", Ok(record("GABC")));

    let state = loader.settled().await;
    assert_eq!(ready_id(&state), Some("GABC"));
}

#[tokio::test]
async fn test_slow_superseded_fetch_is_discarded() {
    let (fetcher, loader) = loader();

    loader.show("GXYZ");
    loader.show("GABC");
    fetcher.wait_for_calls(2).await;

    fetcher.resolve("GABC", Ok(record("GABC")));
    let state = loader.settled().await;
    assert_eq!(ready_id(&state), Some("GABC"));

    fetcher.resolve("GXYZ", Ok(record("GXYZ")));
    drain().await;
    assert_eq!(ready_id(&loader.current_state()), Some("GABC"));
}

#[tokio::test]
async fn test_stale_result_does_not_settle_loading() {
    let (fetcher, loader) = loader();

    loader.show("GXYZ");
    loader.show("GABC");
    fetcher.wait_for_calls(2).await;

    fetcher.resolve("GXYZ", Err(not_found("GXYZ")));
    drain().await;
    assert!(loader.current_state().is_loading());

    fetcher.resolve("GABC", Ok(record("GABC")));
    assert_eq!(ready_id(&loader.settled().await), Some("GABC"));
}

#[tokio::test]
async fn test_repeated_show_issues_one_call() {
    let (fetcher, loader) = loader();

    loader.show("GABC");
    loader.show("GABC");
    loader.show("GABC");
    fetcher.wait_for_calls(1).await;
    drain().await;
    assert_eq!(fetcher.calls(), ["GABC"]);

    fetcher.resolve("GABC", Ok(record("GABC")));
    loader.settled().await;

    loader.show("GABC");
    drain().await;
    assert_eq!(fetcher.calls(), ["GABC"]);
    assert_eq!(ready_id(&loader.current_state()), Some("GABC"));
}

#[tokio::test]
async fn test_returning_to_pending_account_reuses_its_fetch() {
    let (fetcher, loader) = loader();

    loader.show("GAAA");
    loader.show("GBBB");
    loader.show("GAAA");
    fetcher.wait_for_calls(2).await;
    drain().await;
    assert_eq!(fetcher.calls(), ["GAAA", "GBBB"]);

    match loader.current_state() {
        LoadState::Loading { account_id, token } => {
            assert_eq!(account_id, "GAAA");
            assert_eq!(token.value(), 3);
        }
        other => panic!("expected loading, got {:?}", other),
    }

    fetcher.resolve("GAAA", Ok(record("GAAA")));
    assert_eq!(ready_id(&loader.settled().await), Some("GAAA"));

    fetcher.resolve("GBBB", Ok(record("GBBB")));
    drain().await;
    assert_eq!(ready_id(&loader.current_state()), Some("GAAA"));
}

#[tokio::test]
async fn test_not_found_fails_without_retry() {
    let (fetcher, loader) = loader();

    loader.show("GNOTFOUND");
    fetcher.wait_for_calls(1).await;
    fetcher.resolve("GNOTFOUND", Err(not_found("GNOTFOUND")));

    let state = loader.settled().await;
    assert_eq!(
        state,
        LoadState::Failed {
            account_id: "GNOTFOUND".to_string(),
            error: not_found("GNOTFOUND"),
        }
    );

    drain().await;
    assert_eq!(fetcher.calls().len(), 1);
    assert!(fetcher.pending().is_empty());

    // Same id again is a no-op, even after a failure.
    loader.show("GNOTFOUND");
    drain().await;
    assert_eq!(fetcher.calls().len(), 1);
}

#[tokio::test]
async fn test_reload_retries_after_transport_error() {
    let (fetcher, loader) = loader();

    loader.show("GABC");
    fetcher.wait_for_calls(1).await;
    fetcher.resolve("GABC", Err(FetchError::transport("connection reset")));
    let state = loader.settled().await;
    assert!(state.error().is_some_and(FetchError::is_retryable));

    loader.reload();
    assert!(loader.current_state().is_loading());
    fetcher.wait_for_calls(2).await;
    fetcher.resolve("GABC", Ok(record("GABC")));

    assert_eq!(ready_id(&loader.settled().await), Some("GABC"));
    assert_eq!(fetcher.calls(), ["GABC", "GABC"]);
}

#[tokio::test]
async fn test_reload_while_idle_does_nothing() {
    let (fetcher, loader) = loader();
    loader.reload();
    drain().await;
    assert_eq!(loader.current_state(), LoadState::Idle);
    assert!(fetcher.calls().is_empty());
}

#[tokio::test]
async fn test_subscribers_see_transitions() {
    let (fetcher, loader) = loader();
    let mut rx = loader.subscribe();

    loader.show("GABC");
    rx.changed().await.unwrap();
    assert!(rx.borrow_and_update().is_loading());

    fetcher.wait_for_calls(1).await;
    fetcher.resolve("GABC", Ok(record("GABC")));
    rx.changed().await.unwrap();
    assert_eq!(ready_id(&rx.borrow_and_update()), Some("GABC"));
}

#[tokio::test]
async fn test_explorer_screen_uses_anchor() {
    let fetcher = Arc::new(ScriptedFetcher::default());
    let anchors = Arc::new(AnchorRegistry::from_entries([AnchorEntry::new("GANCHOR", "Anchor Co")]));
    let explorer = AccountExplorer::new(fetcher.clone(), anchors)
        .with_json_link(|id| format!("https://horizon.example/accounts/{}", id));

    assert_eq!(explorer.screen(), Screen::Blank);

    explorer.show("GANCHOR");
    assert_eq!(
        explorer.screen(),
        Screen::Loading {
            account_id: "GANCHOR".to_string()
        }
    );

    fetcher.wait_for_calls(1).await;
    fetcher.resolve("GANCHOR", Ok(record("GANCHOR")));

    match explorer.settled_screen().await {
        Screen::Account(view) => {
            assert_eq!(view.sections.identity.label, "Anchor Co");
            assert_eq!(
                view.json_url.as_deref(),
                Some("https://horizon.example/accounts/GANCHOR")
            );
            assert_eq!(view.operations.account_id, "GANCHOR");
        }
        other => panic!("expected account screen, got {:?}", other),
    }
}

#[tokio::test]
async fn test_explorer_error_screen() {
    let fetcher = Arc::new(ScriptedFetcher::default());
    let explorer = AccountExplorer::new(fetcher.clone(), Arc::new(AnchorRegistry::empty()));

    explorer.show("GNOTFOUND");
    fetcher.wait_for_calls(1).await;
    fetcher.resolve("GNOTFOUND", Err(not_found("GNOTFOUND")));

    assert_eq!(
        explorer.settled_screen().await,
        Screen::Error {
            account_id: "GNOTFOUND".to_string(),
            error: not_found("GNOTFOUND"),
        }
    );
}

#[tokio::test]
async fn test_panicking_fetch_fails_and_can_be_retried() {
    let fetcher = Arc::new(PanickingFetcher::panicking_on(&["GXXX"]));
    let loader = AccountLoader::new(fetcher.clone());

    loader.show("GXXX");
    let state = loader.settled().await;
    assert!(state.error().is_some_and(FetchError::is_retryable));

    loader.reload();
    assert_eq!(ready_id(&loader.settled().await), Some("GXXX"));
    assert_eq!(fetcher.calls(), ["GXXX", "GXXX"]);
}

#[tokio::test]
async fn test_panicking_fetch_does_not_wedge_returning_account() {
    let fetcher = Arc::new(PanickingFetcher::panicking_on(&["GXXX"]));
    let loader = AccountLoader::new(fetcher.clone());

    loader.show("GXXX");
    loader.show("GYYY");
    loader.show("GXXX");

    // The adopted GXXX fetch panicked; the loader settles instead of hanging.
    match loader.settled().await {
        LoadState::Failed { account_id, error } => {
            assert_eq!(account_id, "GXXX");
            assert!(error.is_retryable());
        }
        other => panic!("expected failure, got {:?}", other),
    }
    drain().await;

    loader.reload();
    assert_eq!(ready_id(&loader.settled().await), Some("GXXX"));
    assert_eq!(fetcher.calls().iter().filter(|id| *id == "GXXX").count(), 2);
}

proptest! {
    #[test]
    fn test_final_state_follows_last_request(
        requests in prop::collection::vec(0usize..4, 1..8),
        order in prop::collection::vec(any::<u32>(), 8),
    ) {
        let ids = ["GAAA", "GBBB", "GCCC", "GDDD"];
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let final_id = runtime.block_on(async {
            let (fetcher, loader) = loader();
            for &idx in &requests {
                loader.show(ids[idx]);
            }
            drain().await;

            // Release every outstanding fetch in an arbitrary order.
            let mut pending = fetcher.pending();
            let mut keyed: Vec<(u32, String)> = pending
                .drain(..)
                .enumerate()
                .map(|(i, id)| (order[i % order.len()], id))
                .collect();
            keyed.sort();
            for (_, id) in keyed {
                fetcher.resolve(&id, Ok(record(&id)));
                drain().await;
            }

            let state = loader.settled().await;
            ready_id(&state).map(str::to_string)
        });

        prop_assert_eq!(final_id.as_deref(), Some(ids[*requests.last().unwrap()]));
    }
}
