//! Account fetch lifecycle
//!
//! [`AccountLoader`] keeps exactly one authoritative [`LoadState`] for the
//! account currently requested, however fast the requested id changes.
//!
//! ```text
//! Idle ──show(id)──▶ Loading(token, id) ──fetch resolves──▶ Ready | Failed
//!                         ▲                                       │
//!                         └──────────── show(other id) ───────────┘
//! ```
//!
//! Every request is stamped with a monotonically increasing token. A
//! completed fetch is applied only if its token is still the loader's
//! current token; results of superseded requests are dropped. The displayed
//! state therefore always belongs to the most recently *requested* id, never
//! to the most recently *completed* fetch.
//!
//! Superseded requests are not cancelled at the network layer. While a fetch
//! for an id is outstanding, a new request for the same id adopts it instead
//! of issuing a second network call. A fetch that panics resolves as a
//! transport failure, so the id can always be requested again.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use steexp_horizon::AccountRecordFetcher;
use steexp_types::{AccountRecord, FetchError, FetchResult};
use tokio::sync::watch;

/// Stamp identifying one request issued by a loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Observable state of a loader
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    /// Nothing requested yet
    Idle,
    /// A fetch for `account_id` is outstanding
    Loading {
        token: RequestToken,
        account_id: String,
    },
    /// The record for the latest request
    Ready(Arc<AccountRecord>),
    /// The latest request failed
    Failed {
        account_id: String,
        error: FetchError,
    },
}

impl LoadState {
    /// Whether the latest request has resolved
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Ready(_) | Self::Failed { .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub fn record(&self) -> Option<&Arc<AccountRecord>> {
        match self {
            Self::Ready(record) => Some(record),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Control {
    /// Token of the latest request; only this one may be applied
    current: u64,
    /// Account id of the latest request
    target: Option<String>,
    /// Outstanding network calls, by account id, with the token they answer
    in_flight: HashMap<String, u64>,
}

struct Shared {
    fetcher: Arc<dyn AccountRecordFetcher>,
    control: Mutex<Control>,
    state: watch::Sender<LoadState>,
}

impl Shared {
    fn complete(&self, account_id: &str, result: FetchResult<AccountRecord>) {
        let mut control = self.control.lock();
        let answers = control.in_flight.remove(account_id);

        if answers != Some(control.current) {
            tracing::debug!(
                account_id = %account_id,
                current = control.current,
                "Discarding result of superseded request"
            );
            return;
        }

        let next = match result {
            Ok(record) => {
                tracing::info!(
                    account_id = %account_id,
                    balances = record.balances.len(),
                    signers = record.signers.len(),
                    "Account loaded"
                );
                LoadState::Ready(Arc::new(record))
            }
            Err(error) => {
                tracing::warn!(account_id = %account_id, error = %error, "Account fetch failed");
                LoadState::Failed {
                    account_id: account_id.to_string(),
                    error,
                }
            }
        };
        self.state.send_replace(next);
    }
}

/// Owner of one displayed account's fetch lifecycle
///
/// `show` and `reload` schedule work on the tokio runtime and return at once;
/// they must be called from within a runtime context.
#[derive(Clone)]
pub struct AccountLoader {
    shared: Arc<Shared>,
}

impl AccountLoader {
    /// Create an idle loader over a fetcher
    pub fn new(fetcher: Arc<dyn AccountRecordFetcher>) -> Self {
        let (state, _) = watch::channel(LoadState::Idle);
        Self {
            shared: Arc::new(Shared {
                fetcher,
                control: Mutex::new(Control::default()),
                state,
            }),
        }
    }

    /// Display `account_id`
    ///
    /// A no-op when `account_id` is already the loading, loaded or failed
    /// target; otherwise issues a new request.
    pub fn show(&self, account_id: &str) {
        let mut control = self.shared.control.lock();
        if control.target.as_deref() == Some(account_id) {
            tracing::trace!(account_id = %account_id, "Already showing account");
            return;
        }
        self.issue(&mut control, account_id.to_string());
    }

    /// Request the current target again, e.g. after a transport failure
    ///
    /// A no-op while idle.
    pub fn reload(&self) {
        let mut control = self.shared.control.lock();
        if let Some(target) = control.target.clone() {
            self.issue(&mut control, target);
        }
    }

    /// Current state
    pub fn current_state(&self) -> LoadState {
        self.shared.state.borrow().clone()
    }

    /// Account id of the latest request
    pub fn target(&self) -> Option<String> {
        self.shared.control.lock().target.clone()
    }

    /// Receiver notified on every state transition
    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.shared.state.subscribe()
    }

    /// Wait until the latest request has resolved
    ///
    /// Returns immediately with `Idle` when nothing was requested.
    pub async fn settled(&self) -> LoadState {
        let mut rx = self.subscribe();
        loop {
            let state = rx.borrow_and_update().clone();
            if !state.is_loading() {
                return state;
            }
            if rx.changed().await.is_err() {
                return self.current_state();
            }
        }
    }

    fn issue(&self, control: &mut Control, account_id: String) {
        control.current += 1;
        let token = RequestToken(control.current);
        control.target = Some(account_id.clone());

        self.shared.state.send_replace(LoadState::Loading {
            token,
            account_id: account_id.clone(),
        });

        if let Some(answers) = control.in_flight.get_mut(&account_id) {
            tracing::debug!(account_id = %account_id, token = %token, "Adopting outstanding fetch");
            *answers = token.0;
            return;
        }
        control.in_flight.insert(account_id.clone(), token.0);

        tracing::debug!(account_id = %account_id, token = %token, "Fetching account");
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            let fetcher = Arc::clone(&shared.fetcher);
            let id = account_id.clone();
            // The fetch runs in its own task so a panic still reaches `complete`.
            let result = match tokio::spawn(async move { fetcher.fetch(&id).await }).await {
                Ok(result) => result,
                Err(err) => {
                    tracing::error!(account_id = %account_id, error = %err, "Fetch task failed");
                    Err(FetchError::transport(format!("fetch task failed: {}", err)))
                }
            };
            shared.complete(&account_id, result);
        });
    }
}

impl fmt::Debug for AccountLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountLoader")
            .field("control", &*self.shared.control.lock())
            .field("state", &*self.shared.state.borrow())
            .finish()
    }
}
