use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use stride_core::query::{ItemSort, SortDirection, SortField};
use stride_core::types::DbId;
use tokio::sync::RwLock;

use super::ItemStore;
use crate::models::item::{Item, ItemQuery, NewItem, UpdateItem};

#[derive(Default)]
struct Rows {
    last_id: DbId,
    items: BTreeMap<DbId, Item>,
}

/// [`ItemStore`] holding rows in process memory.
///
/// Mirrors the SQL semantics of [`crate::repositories::ItemRepo`]: ids are
/// assigned sequentially from 1, deleted rows stay visible to
/// [`ItemStore::find_by_id`] only, and due-date ordering puts missing dates
/// last in both directions. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryItemStore {
    rows: RwLock<Rows>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn insert(&self, input: &NewItem) -> Result<Item, sqlx::Error> {
        let mut rows = self.rows.write().await;
        rows.last_id += 1;
        let now = chrono::Utc::now();
        let item = Item {
            id: rows.last_id,
            title: input.title.clone(),
            item_type: input.item_type.clone(),
            metadata: input.metadata.clone(),
            space_id: input.placement.space(),
            block_id: input.placement.block(),
            owner_id: input.owner_id,
            due_date: input.due_date,
            is_completed: input.is_completed,
            is_archived: false,
            is_deleted: false,
            labels: input.labels.clone(),
            created_at: now,
            updated_at: now,
        };
        rows.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Item>, sqlx::Error> {
        Ok(self.rows.read().await.items.get(&id).cloned())
    }

    async fn update(&self, id: DbId, input: &UpdateItem) -> Result<Option<Item>, sqlx::Error> {
        let mut rows = self.rows.write().await;
        let Some(item) = rows.items.get_mut(&id).filter(|i| !i.is_deleted) else {
            return Ok(None);
        };

        if let Some(title) = &input.title {
            item.title = title.clone();
        }
        if let Some(item_type) = &input.item_type {
            item.item_type = item_type.clone();
        }
        if let Some(metadata) = &input.metadata {
            item.metadata = metadata.clone();
        }
        if let Some(due_date) = input.due_date {
            item.due_date = Some(due_date);
        }
        if let Some(is_completed) = input.is_completed {
            item.is_completed = is_completed;
        }
        if let Some(is_archived) = input.is_archived {
            item.is_archived = is_archived;
        }
        if let Some(labels) = &input.labels {
            item.labels = labels.clone();
        }
        item.updated_at = chrono::Utc::now();

        Ok(Some(item.clone()))
    }

    async fn soft_delete(&self, id: DbId) -> Result<Option<Item>, sqlx::Error> {
        let mut rows = self.rows.write().await;
        let Some(item) = rows.items.get_mut(&id).filter(|i| !i.is_deleted) else {
            return Ok(None);
        };
        item.is_deleted = true;
        item.updated_at = chrono::Utc::now();
        Ok(Some(item.clone()))
    }

    async fn list(&self, query: &ItemQuery) -> Result<Vec<Item>, sqlx::Error> {
        let rows = self.rows.read().await;
        let mut items: Vec<Item> = rows
            .items
            .values()
            .filter(|item| query.matches(item))
            .cloned()
            .collect();
        items.sort_by(|a, b| compare(&query.sort, a, b));
        Ok(items)
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }
}

fn compare(sort: &ItemSort, a: &Item, b: &Item) -> Ordering {
    let primary = match sort.field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::Title => a.title.cmp(&b.title),
        SortField::DueDate => match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            // NULLS LAST regardless of direction.
            (Some(_), None) => return Ordering::Less,
            (None, Some(_)) => return Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    };
    let ordered = primary.then(a.id.cmp(&b.id));
    match sort.direction {
        SortDirection::Asc => ordered,
        SortDirection::Desc => ordered.reverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::item::ScopeFilter;
    use chrono::{Duration, TimeZone, Utc};
    use stride_core::items::Placement;
    use stride_core::query::parse_due_date;

    fn new_item(owner_id: DbId, placement: Placement, title: &str) -> NewItem {
        NewItem {
            owner_id,
            placement,
            title: title.to_string(),
            item_type: "generic".to_string(),
            metadata: serde_json::json!({}),
            due_date: None,
            is_completed: false,
            labels: Vec::new(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let store = MemoryItemStore::new();
        let a = store.insert(&new_item(1, Placement::Inbox, "a")).await.unwrap();
        let b = store.insert(&new_item(1, Placement::Inbox, "b")).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(store.find_by_id(2).await.unwrap().unwrap().title, "b");
    }

    #[tokio::test]
    async fn update_applies_only_given_fields() {
        let store = MemoryItemStore::new();
        let item = store
            .insert(&new_item(1, Placement::Block { space: 3, block: 4 }, "draft"))
            .await
            .unwrap();

        let patch = UpdateItem {
            is_completed: Some(true),
            ..UpdateItem::default()
        };
        let updated = store.update(item.id, &patch).await.unwrap().unwrap();
        assert_eq!(updated.title, "draft");
        assert!(updated.is_completed);
        assert_eq!(updated.space_id, Some(3));
        assert!(updated.updated_at >= item.updated_at);
    }

    #[tokio::test]
    async fn deleted_rows_are_hidden_from_list_and_update() {
        let store = MemoryItemStore::new();
        let item = store.insert(&new_item(1, Placement::Inbox, "gone")).await.unwrap();

        let deleted = store.soft_delete(item.id).await.unwrap().unwrap();
        assert!(deleted.is_deleted);
        assert!(store.soft_delete(item.id).await.unwrap().is_none());

        let listed = store.list(&ItemQuery::for_owner(1)).await.unwrap();
        assert!(listed.is_empty());
        assert!(store
            .update(item.id, &UpdateItem::default())
            .await
            .unwrap()
            .is_none());

        // Still retained in storage.
        let found = store.find_by_id(item.id).await.unwrap().unwrap();
        assert!(found.is_deleted);
    }

    #[tokio::test]
    async fn list_filters_by_owner_scope_label_and_title() {
        let store = MemoryItemStore::new();
        let block = Placement::Block { space: 10, block: 20 };

        let mut labeled = new_item(1, block, "Project plan");
        labeled.labels = vec!["work".to_string()];
        store.insert(&labeled).await.unwrap();
        store.insert(&new_item(1, Placement::Inbox, "project ideas")).await.unwrap();
        store.insert(&new_item(2, block, "Project other owner")).await.unwrap();
        store
            .insert(&new_item(1, Placement::Block { space: 10, block: 21 }, "groceries"))
            .await
            .unwrap();

        let query = ItemQuery {
            title_contains: Some("PROJ".to_string()),
            ..ItemQuery::for_owner(1)
        };
        assert_eq!(store.list(&query).await.unwrap().len(), 2);

        let query = ItemQuery {
            scope: ScopeFilter::Block { space: 10, block: 20 },
            ..ItemQuery::for_owner(1)
        };
        let items = store.list(&query).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Project plan");

        let query = ItemQuery {
            scope: ScopeFilter::Space(10),
            label: Some("work".to_string()),
            ..ItemQuery::for_owner(1)
        };
        assert_eq!(store.list(&query).await.unwrap().len(), 1);

        let query = ItemQuery {
            scope: ScopeFilter::Inbox,
            ..ItemQuery::for_owner(1)
        };
        let items = store.list(&query).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "project ideas");
    }

    #[tokio::test]
    async fn due_date_sort_puts_missing_dates_last() {
        let store = MemoryItemStore::new();
        let base = Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap();

        let mut late = new_item(1, Placement::Inbox, "late");
        late.due_date = Some(base + Duration::hours(5));
        let mut early = new_item(1, Placement::Inbox, "early");
        early.due_date = Some(base);
        let undated = new_item(1, Placement::Inbox, "undated");

        store.insert(&late).await.unwrap();
        store.insert(&undated).await.unwrap();
        store.insert(&early).await.unwrap();

        let titles = |items: Vec<Item>| items.into_iter().map(|i| i.title).collect::<Vec<_>>();

        let asc = ItemQuery {
            sort: ItemSort::asc(SortField::DueDate),
            ..ItemQuery::for_owner(1)
        };
        assert_eq!(titles(store.list(&asc).await.unwrap()), ["early", "late", "undated"]);

        let desc = ItemQuery {
            sort: ItemSort::desc(SortField::DueDate),
            ..ItemQuery::for_owner(1)
        };
        assert_eq!(titles(store.list(&desc).await.unwrap()), ["late", "early", "undated"]);

        let today = ItemQuery {
            due_within: Some(parse_due_date("2026-10-18").unwrap()),
            ..ItemQuery::for_owner(1)
        };
        assert_eq!(store.list(&today).await.unwrap().len(), 2);
    }
}
