//! Repository for the `items` table.

use sqlx::PgPool;
use stride_core::query::{contains_pattern, SortField};
use stride_core::types::DbId;

use crate::models::item::{Item, ItemQuery, NewItem, ScopeFilter, UpdateItem};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, item_type, metadata, space_id, block_id, owner_id, due_date, \
    is_completed, is_archived, is_deleted, labels, created_at, updated_at";

/// Provides CRUD and filtered listing for items.
pub struct ItemRepo;

impl ItemRepo {
    /// Insert a new item, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewItem) -> Result<Item, sqlx::Error> {
        let query = format!(
            "INSERT INTO items
                (title, item_type, metadata, space_id, block_id, owner_id, due_date,
                 is_completed, labels)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(&input.title)
            .bind(&input.item_type)
            .bind(&input.metadata)
            .bind(input.placement.space())
            .bind(input.placement.block())
            .bind(input.owner_id)
            .bind(input.due_date)
            .bind(input.is_completed)
            .bind(&input.labels)
            .fetch_one(pool)
            .await
    }

    /// Find an item by ID, including soft-deleted rows.
    ///
    /// Callers decide what a deleted row means for them.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update an item. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateItem,
    ) -> Result<Option<Item>, sqlx::Error> {
        let query = format!(
            "UPDATE items SET
                title = COALESCE($2, title),
                item_type = COALESCE($3, item_type),
                metadata = COALESCE($4, metadata),
                due_date = COALESCE($5, due_date),
                is_completed = COALESCE($6, is_completed),
                is_archived = COALESCE($7, is_archived),
                labels = COALESCE($8, labels),
                updated_at = NOW()
             WHERE id = $1 AND is_deleted = FALSE
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.item_type)
            .bind(&input.metadata)
            .bind(input.due_date)
            .bind(input.is_completed)
            .bind(input.is_archived)
            .bind(&input.labels)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete an item, returning the row as it now stands.
    ///
    /// Returns `None` if the item does not exist or is already deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<Option<Item>, sqlx::Error> {
        let query = format!(
            "UPDATE items SET is_deleted = TRUE, updated_at = NOW()
             WHERE id = $1 AND is_deleted = FALSE
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List one owner's live items matching `params`.
    pub async fn list(pool: &PgPool, params: &ItemQuery) -> Result<Vec<Item>, sqlx::Error> {
        // Build dynamic WHERE clauses. $1 is always the owner.
        let mut conditions = vec![
            "owner_id = $1".to_string(),
            "is_deleted = FALSE".to_string(),
        ];
        let mut bind_idx = 2u32;

        match params.scope {
            ScopeFilter::Any => {}
            ScopeFilter::Inbox => {
                conditions.push("space_id IS NULL AND block_id IS NULL".to_string());
            }
            ScopeFilter::Space(_) => {
                conditions.push(format!("space_id = ${bind_idx}"));
                bind_idx += 1;
            }
            ScopeFilter::Block { .. } => {
                conditions.push(format!(
                    "space_id = ${bind_idx} AND block_id = ${}",
                    bind_idx + 1
                ));
                bind_idx += 2;
            }
        }
        if params.item_type.is_some() {
            conditions.push(format!("item_type = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.label.is_some() {
            conditions.push(format!("${bind_idx} = ANY(labels)"));
            bind_idx += 1;
        }
        if params.title_contains.is_some() {
            conditions.push(format!("title ILIKE ${bind_idx}"));
            bind_idx += 1;
        }
        if params.due_within.is_some() {
            conditions.push(format!(
                "due_date >= ${bind_idx} AND due_date < ${}",
                bind_idx + 1
            ));
            bind_idx += 2;
        }
        if params.due_before.is_some() {
            conditions.push(format!("due_date < ${bind_idx}"));
        }
        if params.exclude_completed {
            conditions.push("is_completed = FALSE".to_string());
        }

        let direction = params.sort.direction.keyword();
        let column = params.sort.field.column();
        let nulls = if params.sort.field == SortField::DueDate {
            " NULLS LAST"
        } else {
            ""
        };

        let query = format!(
            "SELECT {COLUMNS} FROM items
             WHERE {}
             ORDER BY {column} {direction}{nulls}, id {direction}",
            conditions.join(" AND "),
        );

        let mut q = sqlx::query_as::<_, Item>(&query).bind(params.owner_id);

        // Bind dynamic parameters in order.
        match params.scope {
            ScopeFilter::Any | ScopeFilter::Inbox => {}
            ScopeFilter::Space(space) => q = q.bind(space),
            ScopeFilter::Block { space, block } => q = q.bind(space).bind(block),
        }
        if let Some(ref item_type) = params.item_type {
            q = q.bind(item_type);
        }
        if let Some(ref label) = params.label {
            q = q.bind(label);
        }
        if let Some(ref term) = params.title_contains {
            q = q.bind(contains_pattern(term));
        }
        if let Some(range) = params.due_within {
            q = q.bind(range.start).bind(range.end);
        }
        if let Some(before) = params.due_before {
            q = q.bind(before);
        }

        q.fetch_all(pool).await
    }
}
