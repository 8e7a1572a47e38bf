//! The cycle view's store: one working list of items, filled either from the
//! inbox or from what is due on a given day.

use chrono::NaiveDate;

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::state::StoreState;
use crate::types::{Item, ItemId, ItemPayload, Session};

pub struct CycleStore {
    api: ApiClient,
    state: StoreState<Item>,
}

impl CycleStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: StoreState::new(),
        }
    }

    pub fn state(&self) -> &StoreState<Item> {
        &self.state
    }

    pub fn items(&self) -> &[Item] {
        &self.state.items
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    pub fn select(&mut self, item: Option<Item>) {
        self.state.select(item);
    }

    /// Load the inbox into the working list.
    pub async fn fetch_inbox_items(&mut self, session: &Session) -> Result<&[Item], ClientError> {
        self.state.begin();
        let result = self.api.list_inbox_items(session, None).await;
        let items = self.state.finish(result)?;
        self.state.replace_all(items);
        Ok(&self.state.items)
    }

    /// Load everything due on `date` (UTC) into the working list.
    pub async fn fetch_today_items(
        &mut self,
        session: &Session,
        date: NaiveDate,
    ) -> Result<&[Item], ClientError> {
        self.state.begin();
        let result = self.api.filter_items(session, Some(date), None).await;
        let items = self.state.finish(result)?;
        self.state.replace_all(items);
        Ok(&self.state.items)
    }

    /// Create an inbox item and put it at the top once the server has it.
    pub async fn create_item(
        &mut self,
        data: &ItemPayload,
        session: &Session,
    ) -> Result<Item, ClientError> {
        self.state.begin();
        let result = self.api.create_inbox_item(session, data).await;
        let item = self.state.finish(result)?;
        self.state.prepend(item.clone());
        Ok(item)
    }

    /// Update an inbox item and replace the cached copy.
    pub async fn mutate_item(
        &mut self,
        data: &ItemPayload,
        session: &Session,
        id: ItemId,
    ) -> Result<Item, ClientError> {
        self.state.begin();
        let result = self.api.update_inbox_item(session, id, data).await;
        let item = self.state.finish(result)?;
        self.state.upsert(item.clone());
        Ok(item)
    }
}
