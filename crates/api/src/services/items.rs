//! Item business rules.
//!
//! Every operation is scoped to the calling user. Lookups by id go through
//! [`ItemService::find_owned`], which hides deleted and out-of-scope items
//! behind `NotFound` and rejects other owners with `Forbidden` before any
//! write happens.

use std::sync::Arc;

use stride_core::error::CoreError;
use stride_core::items::{
    normalize_labels, validate_item_type, validate_metadata, validate_title_for_type, Placement,
    ITEM_TYPE_GENERIC, ITEM_TYPE_LINK, MAX_TITLE_LENGTH, METADATA_FAVICON, METADATA_URL,
};
use stride_core::link_preview::is_http_url;
use stride_core::query::{parse_due_date, ItemSort, SortField};
use stride_core::types::{DbId, Timestamp};
use stride_db::models::item::{CreateItem, Item, ItemQuery, NewItem, ScopeFilter, UpdateItem};
use stride_db::store::ItemStore;

use crate::error::AppResult;
use crate::services::link_preview::LinkPreviewer;

#[derive(Clone)]
pub struct ItemService {
    store: Arc<dyn ItemStore>,
    previewer: Arc<dyn LinkPreviewer>,
}

impl ItemService {
    pub fn new(store: Arc<dyn ItemStore>, previewer: Arc<dyn LinkPreviewer>) -> Self {
        Self { store, previewer }
    }

    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        self.store.health_check().await
    }

    // -----------------------------------------------------------------------
    // Create
    // -----------------------------------------------------------------------

    /// Create an item inside a block. Link items are resolved to their
    /// preview title before insert.
    pub async fn create_item(
        &self,
        user_id: DbId,
        data: CreateItem,
        space: DbId,
        block: DbId,
    ) -> AppResult<Item> {
        self.create(user_id, data, Placement::Block { space, block })
            .await
    }

    /// Create an unscoped inbox item.
    pub async fn create_inbox_item(&self, user_id: DbId, data: CreateItem) -> AppResult<Item> {
        self.create(user_id, data, Placement::Inbox).await
    }

    async fn create(&self, user_id: DbId, data: CreateItem, placement: Placement) -> AppResult<Item> {
        let item_type = data
            .item_type
            .unwrap_or_else(|| ITEM_TYPE_GENERIC.to_string());
        validate_item_type(&item_type).map_err(CoreError::Validation)?;
        validate_title_for_type(&item_type, &data.title).map_err(CoreError::Validation)?;

        let mut metadata = data
            .metadata
            .unwrap_or_else(|| serde_json::Value::Object(Default::default()));
        validate_metadata(&metadata).map_err(CoreError::Validation)?;

        let labels = normalize_labels(&data.labels.unwrap_or_default())
            .map_err(CoreError::Validation)?;

        let mut title = data.title.trim().to_string();
        if item_type == ITEM_TYPE_LINK {
            title = self.apply_link_preview(&title, &mut metadata).await?;
        }

        let input = NewItem {
            owner_id: user_id,
            placement,
            title,
            item_type,
            metadata,
            due_date: data.due_date,
            is_completed: data.is_completed.unwrap_or(false),
            labels,
        };

        let item = self.store.insert(&input).await?;
        tracing::info!(
            user_id,
            item_id = item.id,
            item_type = %item.item_type,
            space = ?item.space_id,
            block = ?item.block_id,
            "Item created"
        );
        Ok(item)
    }

    /// Fetch the preview for `url`, record `url` and `favicon` in
    /// `metadata`, and return the title to store.
    async fn apply_link_preview(
        &self,
        url: &str,
        metadata: &mut serde_json::Value,
    ) -> AppResult<String> {
        if !is_http_url(url) {
            return Err(CoreError::Validation(format!(
                "Link items need an absolute http(s) URL as their title, got '{url}'"
            ))
            .into());
        }

        let preview = self.previewer.preview(url).await.map_err(|e| {
            tracing::warn!(url, error = %e, "Link preview failed");
            CoreError::Upstream(format!("Could not fetch a preview for {url}"))
        })?;

        if let Some(map) = metadata.as_object_mut() {
            map.insert(METADATA_URL.to_string(), url.into());
            map.insert(
                METADATA_FAVICON.to_string(),
                preview.favicon.map_or(serde_json::Value::Null, Into::into),
            );
        }

        Ok(preview.title.chars().take(MAX_TITLE_LENGTH).collect())
    }

    // -----------------------------------------------------------------------
    // Update / delete
    // -----------------------------------------------------------------------

    pub async fn update_item(
        &self,
        user_id: DbId,
        id: DbId,
        data: UpdateItem,
        space: DbId,
        block: DbId,
    ) -> AppResult<Item> {
        self.update(user_id, id, data, Placement::Block { space, block })
            .await
    }

    pub async fn update_inbox_item(
        &self,
        user_id: DbId,
        id: DbId,
        data: UpdateItem,
    ) -> AppResult<Item> {
        self.update(user_id, id, data, Placement::Inbox).await
    }

    async fn update(
        &self,
        user_id: DbId,
        id: DbId,
        mut data: UpdateItem,
        placement: Placement,
    ) -> AppResult<Item> {
        if let Some(item_type) = &data.item_type {
            validate_item_type(item_type).map_err(CoreError::Validation)?;
        }
        if let Some(metadata) = &data.metadata {
            validate_metadata(metadata).map_err(CoreError::Validation)?;
        }
        if let Some(labels) = data.labels.take() {
            data.labels = Some(normalize_labels(&labels).map_err(CoreError::Validation)?);
        }

        let current = self.find_owned(user_id, id, placement).await?;

        if let Some(title) = data.title.take() {
            let item_type = data.item_type.as_deref().unwrap_or(&current.item_type);
            validate_title_for_type(item_type, &title).map_err(CoreError::Validation)?;
            data.title = Some(title.trim().to_string());
        }

        // Deleted between the lookup and the write.
        let item = self
            .store
            .update(id, &data)
            .await?
            .ok_or_else(|| CoreError::item_not_found(id))?;

        tracing::info!(user_id, item_id = id, "Item updated");
        Ok(item)
    }

    /// Soft-delete an item in a block, returning the record as marked.
    pub async fn delete_item(
        &self,
        id: DbId,
        space: DbId,
        block: DbId,
        user_id: DbId,
    ) -> AppResult<Item> {
        self.delete(user_id, id, Placement::Block { space, block })
            .await
    }

    pub async fn delete_inbox_item(&self, user_id: DbId, id: DbId) -> AppResult<Item> {
        self.delete(user_id, id, Placement::Inbox).await
    }

    async fn delete(&self, user_id: DbId, id: DbId, placement: Placement) -> AppResult<Item> {
        self.find_owned(user_id, id, placement).await?;

        let item = self
            .store
            .soft_delete(id)
            .await?
            .ok_or_else(|| CoreError::item_not_found(id))?;

        tracing::info!(user_id, item_id = id, "Item deleted");
        Ok(item)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn get_item(
        &self,
        user_id: DbId,
        id: DbId,
        space: DbId,
        block: DbId,
    ) -> AppResult<Item> {
        self.find_owned(user_id, id, Placement::Block { space, block })
            .await
    }

    /// All of the user's items, inbox and scoped, filtered by due day and
    /// ordered by `sort` (`field` or `-field`).
    pub async fn filter_items(
        &self,
        user_id: DbId,
        due_date: Option<&str>,
        sort: Option<&str>,
    ) -> AppResult<Vec<Item>> {
        let due_within = due_date
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(parse_due_date)
            .transpose()?;

        let query = ItemQuery {
            due_within,
            sort: ItemSort::parse(sort)?,
            ..ItemQuery::for_owner(user_id)
        };
        Ok(self.store.list(&query).await?)
    }

    /// Items in one block, oldest first.
    pub async fn get_all_items_by_block(
        &self,
        user_id: DbId,
        space: DbId,
        block: DbId,
    ) -> AppResult<Vec<Item>> {
        let query = ItemQuery {
            scope: ScopeFilter::Block { space, block },
            sort: ItemSort::asc(SortField::CreatedAt),
            ..ItemQuery::for_owner(user_id)
        };
        Ok(self.store.list(&query).await?)
    }

    /// Items carrying `label`, optionally only those inside `space`.
    pub async fn get_item_filter_by_label(
        &self,
        label: &str,
        user_id: DbId,
        space: Option<DbId>,
    ) -> AppResult<Vec<Item>> {
        let label = label.trim();
        if label.is_empty() {
            return Err(CoreError::Validation("Label name must not be empty".to_string()).into());
        }

        let query = ItemQuery {
            scope: space.map_or(ScopeFilter::Any, ScopeFilter::Space),
            label: Some(label.to_string()),
            ..ItemQuery::for_owner(user_id)
        };
        Ok(self.store.list(&query).await?)
    }

    /// Case-insensitive title substring search. Wildcards match literally.
    pub async fn search_items_by_title(&self, query: &str, user_id: DbId) -> AppResult<Vec<Item>> {
        let term = query.trim();
        if term.is_empty() {
            return Err(CoreError::Validation("Search query must not be empty".to_string()).into());
        }

        let query = ItemQuery {
            title_contains: Some(term.to_string()),
            ..ItemQuery::for_owner(user_id)
        };
        Ok(self.store.list(&query).await?)
    }

    /// Inbox items, newest first, optionally of one type.
    pub async fn list_inbox_items(
        &self,
        user_id: DbId,
        item_type: Option<&str>,
    ) -> AppResult<Vec<Item>> {
        let item_type = item_type.map(str::trim).filter(|t| !t.is_empty());
        if let Some(t) = item_type {
            validate_item_type(t).map_err(CoreError::Validation)?;
        }

        let query = ItemQuery {
            scope: ScopeFilter::Inbox,
            item_type: item_type.map(str::to_string),
            ..ItemQuery::for_owner(user_id)
        };
        Ok(self.store.list(&query).await?)
    }

    /// Open inbox items due before `now`, earliest due first.
    pub async fn list_overdue_inbox_items(
        &self,
        user_id: DbId,
        now: Timestamp,
    ) -> AppResult<Vec<Item>> {
        let query = ItemQuery {
            scope: ScopeFilter::Inbox,
            due_before: Some(now),
            exclude_completed: true,
            sort: ItemSort::asc(SortField::DueDate),
            ..ItemQuery::for_owner(user_id)
        };
        Ok(self.store.list(&query).await?)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Load a live item in `placement` that belongs to `user_id`.
    async fn find_owned(&self, user_id: DbId, id: DbId, placement: Placement) -> AppResult<Item> {
        let item = self
            .store
            .find_by_id(id)
            .await?
            .filter(|item| !item.is_deleted && item.is_in(placement))
            .ok_or_else(|| CoreError::item_not_found(id))?;

        if item.owner_id != user_id {
            tracing::warn!(user_id, item_id = id, owner_id = item.owner_id, "Item owner mismatch");
            return Err(CoreError::Forbidden("You do not own this item".to_string()).into());
        }
        Ok(item)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use stride_core::link_preview::LinkPreview;
    use stride_db::store::MemoryItemStore;

    use super::*;
    use crate::error::AppError;
    use crate::services::link_preview::PreviewError;

    const OWNER: DbId = 1;
    const OTHER: DbId = 2;

    struct FixedPreviewer;

    #[async_trait]
    impl LinkPreviewer for FixedPreviewer {
        async fn preview(&self, url: &str) -> Result<LinkPreview, PreviewError> {
            Ok(LinkPreview {
                title: "Example Domain".to_string(),
                favicon: Some(format!("{url}/favicon.ico")),
            })
        }
    }

    struct DownPreviewer;

    #[async_trait]
    impl LinkPreviewer for DownPreviewer {
        async fn preview(&self, _url: &str) -> Result<LinkPreview, PreviewError> {
            Err(PreviewError::HttpStatus(503))
        }
    }

    fn service() -> ItemService {
        ItemService::new(Arc::new(MemoryItemStore::new()), Arc::new(FixedPreviewer))
    }

    fn titled(title: &str) -> CreateItem {
        CreateItem {
            title: title.to_string(),
            ..CreateItem::default()
        }
    }

    #[tokio::test]
    async fn scoped_item_takes_route_placement() {
        let svc = service();
        let item = svc.create_item(OWNER, titled("Write report"), 7, 9).await.unwrap();

        assert_eq!(item.space_id, Some(7));
        assert_eq!(item.block_id, Some(9));
        assert_eq!(item.owner_id, OWNER);
        assert_eq!(item.item_type, ITEM_TYPE_GENERIC);
        assert!(!item.is_deleted);
    }

    #[tokio::test]
    async fn link_item_stores_preview_title_and_url() {
        let svc = service();
        let data = CreateItem {
            title: "https://x.com".to_string(),
            item_type: Some("link".to_string()),
            ..CreateItem::default()
        };
        let item = svc.create_item(OWNER, data, 3, 4).await.unwrap();

        assert_eq!(item.title, "Example Domain");
        assert_eq!(item.item_type, "link");
        assert_eq!(item.metadata["url"], "https://x.com");
        assert_eq!(item.metadata["favicon"], "https://x.com/favicon.ico");
        assert_eq!(item.space_id, Some(3));
    }

    #[tokio::test]
    async fn link_item_requires_http_url() {
        let svc = service();
        let data = CreateItem {
            title: "not a url".to_string(),
            item_type: Some("link".to_string()),
            ..CreateItem::default()
        };
        let result = svc.create_inbox_item(OWNER, data).await;
        assert_matches!(result, Err(AppError::Core(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn failed_preview_is_upstream_error() {
        let svc = ItemService::new(Arc::new(MemoryItemStore::new()), Arc::new(DownPreviewer));
        let data = CreateItem {
            title: "https://down.example".to_string(),
            item_type: Some("link".to_string()),
            ..CreateItem::default()
        };
        let result = svc.create_inbox_item(OWNER, data).await;
        assert_matches!(result, Err(AppError::Core(CoreError::Upstream(_))));
    }

    #[tokio::test]
    async fn rejects_blank_title_and_unknown_type() {
        let svc = service();
        assert_matches!(
            svc.create_inbox_item(OWNER, titled("   ")).await,
            Err(AppError::Core(CoreError::Validation(_)))
        );

        let data = CreateItem {
            title: "x".to_string(),
            item_type: Some("meeting".to_string()),
            ..CreateItem::default()
        };
        assert_matches!(
            svc.create_inbox_item(OWNER, data).await,
            Err(AppError::Core(CoreError::Validation(_)))
        );
    }

    #[tokio::test]
    async fn update_outside_scope_is_not_found() {
        let svc = service();
        let item = svc.create_item(OWNER, titled("a"), 1, 1).await.unwrap();

        let result = svc
            .update_item(OWNER, item.id, UpdateItem::default(), 1, 2)
            .await;
        assert_matches!(result, Err(AppError::Core(CoreError::NotFound { .. })));

        let result = svc
            .update_inbox_item(OWNER, item.id, UpdateItem::default())
            .await;
        assert_matches!(result, Err(AppError::Core(CoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn update_applies_partial_fields() {
        let svc = service();
        let item = svc.create_item(OWNER, titled("draft"), 1, 1).await.unwrap();

        let patch = UpdateItem {
            is_completed: Some(true),
            labels: Some(vec![" work ".to_string(), "work".to_string()]),
            ..UpdateItem::default()
        };
        let updated = svc.update_item(OWNER, item.id, patch, 1, 1).await.unwrap();

        assert_eq!(updated.title, "draft");
        assert!(updated.is_completed);
        assert_eq!(updated.labels, vec!["work".to_string()]);
        assert!(updated.updated_at >= item.updated_at);
    }

    #[tokio::test]
    async fn non_owner_cannot_delete_or_update() {
        let svc = service();
        let item = svc.create_item(OWNER, titled("mine"), 1, 1).await.unwrap();

        let result = svc.delete_item(item.id, 1, 1, OTHER).await;
        assert_matches!(result, Err(AppError::Core(CoreError::Forbidden(_))));

        let patch = UpdateItem {
            title: Some("theirs".to_string()),
            ..UpdateItem::default()
        };
        let result = svc.update_item(OTHER, item.id, patch, 1, 1).await;
        assert_matches!(result, Err(AppError::Core(CoreError::Forbidden(_))));

        let still = svc.get_item(OWNER, item.id, 1, 1).await.unwrap();
        assert_eq!(still.title, "mine");
        assert!(!still.is_deleted);
    }

    #[tokio::test]
    async fn delete_is_soft_and_hides_the_item() {
        let svc = service();
        let item = svc.create_item(OWNER, titled("gone"), 1, 1).await.unwrap();

        let deleted = svc.delete_item(item.id, 1, 1, OWNER).await.unwrap();
        assert!(deleted.is_deleted);

        assert_matches!(
            svc.get_item(OWNER, item.id, 1, 1).await,
            Err(AppError::Core(CoreError::NotFound { .. }))
        );
        assert_matches!(
            svc.delete_item(item.id, 1, 1, OWNER).await,
            Err(AppError::Core(CoreError::NotFound { .. }))
        );
        assert!(svc.filter_items(OWNER, None, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn filter_by_due_day_and_sort() {
        let svc = service();
        let day = Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap();

        for (title, due) in [
            ("b", Some(day)),
            ("a", Some(day + Duration::hours(5))),
            ("c", Some(day + Duration::days(1))),
            ("d", None),
        ] {
            let data = CreateItem {
                due_date: due,
                ..titled(title)
            };
            svc.create_inbox_item(OWNER, data).await.unwrap();
        }

        let items = svc
            .filter_items(OWNER, Some("2026-03-14"), Some("title"))
            .await
            .unwrap();
        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["a", "b"]);

        assert_matches!(
            svc.filter_items(OWNER, None, Some("-owner")).await,
            Err(AppError::Core(CoreError::Validation(_)))
        );
        assert_matches!(
            svc.filter_items(OWNER, Some("14/03/2026"), None).await,
            Err(AppError::Core(CoreError::Validation(_)))
        );
    }

    #[tokio::test]
    async fn block_listing_is_oldest_first_and_owner_scoped() {
        let svc = service();
        let first = svc.create_item(OWNER, titled("first"), 5, 6).await.unwrap();
        let second = svc.create_item(OWNER, titled("second"), 5, 6).await.unwrap();
        svc.create_item(OWNER, titled("elsewhere"), 5, 7).await.unwrap();
        svc.create_item(OTHER, titled("foreign"), 5, 6).await.unwrap();

        let ids: Vec<_> = svc
            .get_all_items_by_block(OWNER, 5, 6)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, [first.id, second.id]);
    }

    #[tokio::test]
    async fn label_filter_optionally_scopes_to_space() {
        let svc = service();
        let labelled = |title: &str| CreateItem {
            labels: Some(vec!["urgent".to_string()]),
            ..titled(title)
        };
        svc.create_item(OWNER, labelled("in space"), 1, 1).await.unwrap();
        svc.create_item(OWNER, labelled("other space"), 2, 1).await.unwrap();
        svc.create_inbox_item(OWNER, labelled("inbox")).await.unwrap();
        svc.create_item(OWNER, titled("unlabelled"), 1, 1).await.unwrap();

        let all = svc.get_item_filter_by_label("urgent", OWNER, None).await.unwrap();
        assert_eq!(all.len(), 3);

        let scoped = svc
            .get_item_filter_by_label("urgent", OWNER, Some(1))
            .await
            .unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].title, "in space");
    }

    #[tokio::test]
    async fn search_is_case_insensitive_and_literal() {
        let svc = service();
        svc.create_inbox_item(OWNER, titled("Project plan")).await.unwrap();
        svc.create_inbox_item(OWNER, titled("side PROJ")).await.unwrap();
        svc.create_inbox_item(OWNER, titled("groceries")).await.unwrap();
        svc.create_inbox_item(OTHER, titled("proj of someone else"))
            .await
            .unwrap();
        let deleted = svc.create_inbox_item(OWNER, titled("old proj")).await.unwrap();
        svc.delete_inbox_item(OWNER, deleted.id).await.unwrap();

        let hits = svc.search_items_by_title("proj", OWNER).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|i| i.owner_id == OWNER && !i.is_deleted));

        assert!(svc.search_items_by_title("%", OWNER).await.unwrap().is_empty());
        assert_matches!(
            svc.search_items_by_title("  ", OWNER).await,
            Err(AppError::Core(CoreError::Validation(_)))
        );
    }

    #[tokio::test]
    async fn inbox_listing_filters_by_type() {
        let svc = service();
        svc.create_item(OWNER, titled("scoped"), 1, 1).await.unwrap();
        svc.create_inbox_item(OWNER, titled("loose")).await.unwrap();
        let note = CreateItem {
            item_type: Some("note".to_string()),
            ..titled("journal")
        };
        svc.create_inbox_item(OWNER, note).await.unwrap();

        assert_eq!(svc.list_inbox_items(OWNER, None).await.unwrap().len(), 2);

        let notes = svc.list_inbox_items(OWNER, Some("note")).await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "journal");
    }

    #[tokio::test]
    async fn overdue_excludes_completed_and_future() {
        let svc = service();
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();

        let due = |title: &str, offset: Duration, done: bool| CreateItem {
            due_date: Some(now + offset),
            is_completed: Some(done),
            ..titled(title)
        };
        svc.create_inbox_item(OWNER, due("late", Duration::hours(-1), false))
            .await
            .unwrap();
        svc.create_inbox_item(OWNER, due("later", Duration::days(-3), false))
            .await
            .unwrap();
        svc.create_inbox_item(OWNER, due("done", Duration::days(-2), true))
            .await
            .unwrap();
        svc.create_inbox_item(OWNER, due("upcoming", Duration::hours(1), false))
            .await
            .unwrap();

        let titles: Vec<_> = svc
            .list_overdue_inbox_items(OWNER, now)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.title)
            .collect();
        assert_eq!(titles, ["later", "late"]);
    }
}
