//! Paginated operations and transactions lists
//!
//! Each list fetches and pages its own feed from the request the account
//! view hands it. Page loads are stamped with a generation so a page that
//! arrives after the user moved on (another account, another page) is dropped.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use steexp_explorer::AccountView;
use steexp_horizon::{HorizonClient, OperationSummary, Page, TransactionSummary};
use steexp_types::{FeedKind, FeedRequest, FetchError, FetchResult};

pub(crate) enum FeedPage<T> {
    Loading,
    Loaded(Page<T>),
    Failed(FetchError),
}

pub(crate) struct FeedList<T> {
    pub request: FeedRequest,
    /// Cursors of the visited pages; the last one is showing
    cursors: Vec<Option<String>>,
    generation: u64,
    pub page: FeedPage<T>,
}

impl<T> FeedList<T> {
    fn new(request: FeedRequest) -> Self {
        Self {
            request,
            cursors: vec![None],
            generation: 0,
            page: FeedPage::Loading,
        }
    }

    /// 1-based number of the page showing
    pub fn page_number(&self) -> usize {
        self.cursors.len()
    }

    fn begin(&mut self) -> (u64, FeedRequest, Option<String>) {
        self.generation += 1;
        self.page = FeedPage::Loading;
        let cursor = self.cursors.last().cloned().flatten();
        (self.generation, self.request.clone(), cursor)
    }

    fn next_cursor(&self) -> Option<String> {
        match &self.page {
            FeedPage::Loaded(page) => page.next_cursor.clone(),
            _ => None,
        }
    }
}

pub(crate) struct FeedLists {
    pub account_id: String,
    pub operations: FeedList<OperationSummary>,
    pub transactions: FeedList<TransactionSummary>,
}

#[derive(Clone)]
pub(crate) struct Feeds {
    horizon: HorizonClient,
    lists: Arc<Mutex<Option<FeedLists>>>,
}

impl Feeds {
    pub fn new(horizon: HorizonClient) -> Self {
        Self {
            horizon,
            lists: Arc::new(Mutex::new(None)),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, Option<FeedLists>> {
        self.lists.lock()
    }

    /// Point both lists at the view's account, loading first pages on change
    pub fn attach(&self, view: &AccountView) {
        {
            let mut lists = self.lists.lock();
            if lists
                .as_ref()
                .is_some_and(|l| l.account_id == view.operations.account_id)
            {
                return;
            }
            *lists = Some(FeedLists {
                account_id: view.operations.account_id.clone(),
                operations: FeedList::new(view.operations.clone()),
                transactions: FeedList::new(view.transactions.clone()),
            });
        }
        self.load(FeedKind::Operations);
        self.load(FeedKind::Transactions);
    }

    /// Forget the lists, e.g. when the account page is gone
    pub fn detach(&self) {
        *self.lists.lock() = None;
    }

    /// Move a list to its next page, when there is one
    pub fn next(&self, kind: FeedKind) {
        let moved = {
            let mut lists = self.lists.lock();
            let Some(lists) = lists.as_mut() else { return };
            match kind {
                FeedKind::Operations => push_cursor(&mut lists.operations),
                FeedKind::Transactions => push_cursor(&mut lists.transactions),
            }
        };
        if moved {
            self.load(kind);
        }
    }

    /// Move a list back to its previous page
    pub fn prev(&self, kind: FeedKind) {
        let moved = {
            let mut lists = self.lists.lock();
            let Some(lists) = lists.as_mut() else { return };
            match kind {
                FeedKind::Operations => pop_cursor(&mut lists.operations),
                FeedKind::Transactions => pop_cursor(&mut lists.transactions),
            }
        };
        if moved {
            self.load(kind);
        }
    }

    fn load(&self, kind: FeedKind) {
        let started = {
            let mut lists = self.lists.lock();
            let Some(lists) = lists.as_mut() else { return };
            let begun = match kind {
                FeedKind::Operations => lists.operations.begin(),
                FeedKind::Transactions => lists.transactions.begin(),
            };
            (lists.account_id.clone(), begun)
        };
        let (account_id, (generation, request, cursor)) = started;

        let horizon = self.horizon.clone();
        let lists = Arc::clone(&self.lists);
        tokio::spawn(async move {
            match kind {
                FeedKind::Operations => {
                    let result = horizon.operations(&request, cursor.as_deref()).await;
                    apply(&lists, &account_id, generation, result, |l| &mut l.operations);
                }
                FeedKind::Transactions => {
                    let result = horizon.transactions(&request, cursor.as_deref()).await;
                    apply(&lists, &account_id, generation, result, |l| &mut l.transactions);
                }
            }
        });
    }
}

fn push_cursor<T>(list: &mut FeedList<T>) -> bool {
    match list.next_cursor() {
        Some(cursor) if list.request.paging_enabled => {
            list.cursors.push(Some(cursor));
            true
        }
        _ => false,
    }
}

fn pop_cursor<T>(list: &mut FeedList<T>) -> bool {
    if list.cursors.len() > 1 {
        list.cursors.pop();
        true
    } else {
        false
    }
}

fn apply<T>(
    lists: &Mutex<Option<FeedLists>>,
    account_id: &str,
    generation: u64,
    result: FetchResult<Page<T>>,
    select: impl FnOnce(&mut FeedLists) -> &mut FeedList<T>,
) {
    let mut lists = lists.lock();
    let Some(lists) = lists.as_mut().filter(|l| l.account_id == account_id) else {
        return;
    };
    let list = select(lists);
    if list.generation != generation {
        tracing::debug!(account_id = %account_id, "Dropping superseded feed page");
        return;
    }
    list.page = match result {
        Ok(page) => FeedPage::Loaded(page),
        Err(err) => FeedPage::Failed(err),
    };
}
