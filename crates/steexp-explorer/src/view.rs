//! Account page composition
//!
//! [`AccountView`] is the assembled sections plus the inputs for the two
//! externally owned history sub-lists. [`AccountExplorer`] ties a loader, the
//! anchor registry and list settings together and turns the loader's state
//! into a [`Screen`] for a presentation layer.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use steexp_horizon::AccountRecordFetcher;
use steexp_types::{AccountRecord, AnchorEntry, FeedKind, FeedRequest, FetchError};

use crate::anchors::AnchorRegistry;
use crate::assembler::{assemble, AccountSections};
use crate::loader::{AccountLoader, LoadState};

/// Page sizes and paging for the history sub-lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListSettings {
    pub operations_page_size: u32,
    pub transactions_page_size: u32,
    pub paging_enabled: bool,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            operations_page_size: 20,
            transactions_page_size: 10,
            paging_enabled: true,
        }
    }
}

/// The fully composed account page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountView {
    pub sections: AccountSections,
    /// Link to the raw JSON record
    pub json_url: Option<String>,
    pub operations: FeedRequest,
    pub transactions: FeedRequest,
}

impl AccountView {
    pub fn compose(
        record: &AccountRecord,
        anchor: Option<&AnchorEntry>,
        lists: &ListSettings,
        json_url: Option<String>,
    ) -> Self {
        Self {
            sections: assemble(record, anchor),
            json_url,
            operations: FeedRequest::new(
                FeedKind::Operations,
                &record.id,
                lists.operations_page_size,
                lists.paging_enabled,
            ),
            transactions: FeedRequest::new(
                FeedKind::Transactions,
                &record.id,
                lists.transactions_page_size,
                lists.paging_enabled,
            ),
        }
    }
}

/// What a presentation layer should draw for a loader state
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// Nothing requested
    Blank,
    Loading { account_id: String },
    /// The latest request failed; the layer decides between redirect and panel
    Error { account_id: String, error: FetchError },
    Account(Box<AccountView>),
}

type JsonLink = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Loader, anchor registry and list settings for one displayed account
#[derive(Clone)]
pub struct AccountExplorer {
    loader: AccountLoader,
    anchors: Arc<AnchorRegistry>,
    lists: ListSettings,
    json_link: Option<JsonLink>,
}

impl AccountExplorer {
    pub fn new(fetcher: Arc<dyn AccountRecordFetcher>, anchors: Arc<AnchorRegistry>) -> Self {
        Self {
            loader: AccountLoader::new(fetcher),
            anchors,
            lists: ListSettings::default(),
            json_link: None,
        }
    }

    /// Set the sub-list settings
    pub fn with_lists(mut self, lists: ListSettings) -> Self {
        self.lists = lists;
        self
    }

    /// Set how the raw JSON link is built from an account id
    pub fn with_json_link(mut self, link: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.json_link = Some(Arc::new(link));
        self
    }

    pub fn loader(&self) -> &AccountLoader {
        &self.loader
    }

    pub fn anchors(&self) -> &AnchorRegistry {
        &self.anchors
    }

    pub fn lists(&self) -> &ListSettings {
        &self.lists
    }

    /// Display an account; see [`AccountLoader::show`]
    pub fn show(&self, account_id: &str) {
        self.loader.show(account_id);
    }

    /// Compose the page for a loaded record
    pub fn view(&self, record: &AccountRecord) -> AccountView {
        AccountView::compose(
            record,
            self.anchors.lookup(&record.id),
            &self.lists,
            self.json_link.as_ref().map(|link| link(&record.id)),
        )
    }

    /// Screen for a given loader state
    pub fn screen_for(&self, state: &LoadState) -> Screen {
        match state {
            LoadState::Idle => Screen::Blank,
            LoadState::Loading { account_id, .. } => Screen::Loading {
                account_id: account_id.clone(),
            },
            LoadState::Failed { account_id, error } => Screen::Error {
                account_id: account_id.clone(),
                error: error.clone(),
            },
            LoadState::Ready(record) => Screen::Account(Box::new(self.view(record))),
        }
    }

    /// Screen for the loader's current state
    pub fn screen(&self) -> Screen {
        self.screen_for(&self.loader.current_state())
    }

    /// Wait for the latest request to resolve and return its screen
    pub async fn settled_screen(&self) -> Screen {
        let state = self.loader.settled().await;
        self.screen_for(&state)
    }
}

impl fmt::Debug for AccountExplorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountExplorer")
            .field("loader", &self.loader)
            .field("anchors", &self.anchors.len())
            .field("lists", &self.lists)
            .finish()
    }
}
