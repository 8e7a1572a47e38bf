//! The inbox view's store, with separate lists for all, today and overdue.

use chrono::NaiveDate;

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::state::StoreState;
use crate::types::{Item, Session};

pub struct InboxStore {
    api: ApiClient,
    pub inbox: StoreState<Item>,
    pub today: StoreState<Item>,
    pub overdue: StoreState<Item>,
}

impl InboxStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            inbox: StoreState::new(),
            today: StoreState::new(),
            overdue: StoreState::new(),
        }
    }

    pub fn reset(&mut self) {
        self.inbox.reset();
        self.today.reset();
        self.overdue.reset();
    }

    pub fn is_fetched(&self) -> bool {
        self.inbox.is_fetched && self.today.is_fetched && self.overdue.is_fetched
    }

    pub async fn fetch_inbox(&mut self, session: &Session) -> Result<&[Item], ClientError> {
        self.inbox.begin();
        let result = self.api.list_inbox_items(session, None).await;
        let items = self.inbox.finish(result)?;
        self.inbox.replace_all(items);
        Ok(&self.inbox.items)
    }

    /// Inbox items due on `date`. Scoped items due that day are left out.
    pub async fn fetch_today(
        &mut self,
        session: &Session,
        date: NaiveDate,
    ) -> Result<&[Item], ClientError> {
        self.today.begin();
        let result = self.api.filter_items(session, Some(date), None).await;
        let items = self.today.finish(result)?;
        self.today
            .replace_all(items.into_iter().filter(Item::is_inbox).collect());
        Ok(&self.today.items)
    }

    pub async fn fetch_overdue(&mut self, session: &Session) -> Result<&[Item], ClientError> {
        self.overdue.begin();
        let result = self.api.list_overdue_items(session).await;
        let items = self.overdue.finish(result)?;
        self.overdue.replace_all(items);
        Ok(&self.overdue.items)
    }
}
