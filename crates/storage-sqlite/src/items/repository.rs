use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;

use ledgersync_core::errors::{Error, Result};
use ledgersync_core::items::{
    InstitutionDetails, LinkedItem, LinkedItemRepositoryTrait, LinkedItemStatus, NewLinkedItem,
};
use ledgersync_core::providers::Product;

use super::model::{products_to_json, LinkedItemDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::linked_items;

pub struct LinkedItemRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl LinkedItemRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

/// Fails with `NotFound` when the update touched no row.
fn ensure_updated(affected: usize, item_id: &str) -> Result<()> {
    if affected == 0 {
        return Err(Error::not_found("LinkedItem", item_id));
    }
    Ok(())
}

fn load_item(conn: &mut SqliteConnection, item_id: &str) -> Result<Option<LinkedItemDB>> {
    Ok(linked_items::table
        .find(item_id)
        .select(LinkedItemDB::as_select())
        .first::<LinkedItemDB>(conn)
        .optional()
        .map_err(StorageError::from)?)
}

#[async_trait]
impl LinkedItemRepositoryTrait for LinkedItemRepository {
    async fn create(&self, new_item: NewLinkedItem) -> Result<LinkedItem> {
        new_item.validate()?;

        self.writer
            .exec(move |conn| {
                let item_db: LinkedItemDB = new_item.into();
                diesel::insert_into(linked_items::table)
                    .values(&item_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(item_db.into())
            })
            .await
    }

    async fn update_status(&self, item_id: &str, status: LinkedItemStatus) -> Result<()> {
        let item_id = item_id.to_string();
        self.writer
            .exec(move |conn| {
                let affected = diesel::update(linked_items::table.find(&item_id))
                    .set((
                        linked_items::status.eq(status.as_str()),
                        linked_items::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                ensure_updated(affected, &item_id)
            })
            .await
    }

    async fn update_products(
        &self,
        item_id: &str,
        products: Vec<Product>,
        institution_id: Option<String>,
    ) -> Result<()> {
        let item_id = item_id.to_string();
        self.writer
            .exec(move |conn| {
                let affected = diesel::update(linked_items::table.find(&item_id))
                    .set((
                        linked_items::products.eq(products_to_json(&products)),
                        linked_items::institution_id.eq(institution_id),
                        linked_items::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                ensure_updated(affected, &item_id)
            })
            .await
    }

    async fn update_institution(&self, item_id: &str, details: InstitutionDetails) -> Result<()> {
        let item_id = item_id.to_string();
        self.writer
            .exec(move |conn| {
                let affected = diesel::update(linked_items::table.find(&item_id))
                    .set((
                        linked_items::institution_url.eq(details.url),
                        linked_items::logo_url.eq(details.logo_url),
                        linked_items::brand_color.eq(details.brand_color),
                        linked_items::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                ensure_updated(affected, &item_id)
            })
            .await
    }

    async fn update_cursor(&self, item_id: &str, cursor: String) -> Result<()> {
        let item_id = item_id.to_string();
        self.writer
            .exec(move |conn| {
                let affected = diesel::update(linked_items::table.find(&item_id))
                    .set((
                        linked_items::cursor.eq(Some(cursor)),
                        linked_items::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                ensure_updated(affected, &item_id)
            })
            .await
    }

    async fn update_credentials(&self, item_id: &str, access_token: String) -> Result<()> {
        let item_id = item_id.to_string();
        self.writer
            .exec(move |conn| {
                let affected = diesel::update(linked_items::table.find(&item_id))
                    .set((
                        linked_items::access_token.eq(access_token),
                        linked_items::status.eq(LinkedItemStatus::Good.as_str()),
                        linked_items::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                ensure_updated(affected, &item_id)
            })
            .await
    }

    async fn delete(&self, item_id: &str) -> Result<usize> {
        let item_id = item_id.to_string();
        self.writer
            .exec(move |conn| {
                // Accounts, entries, holdings and balances go with it via ON DELETE CASCADE.
                Ok(diesel::delete(linked_items::table.find(&item_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    fn get_by_id(&self, item_id: &str) -> Result<LinkedItem> {
        let mut conn = get_connection(&self.pool)?;
        load_item(&mut conn, item_id)?
            .map(LinkedItem::from)
            .ok_or_else(|| Error::not_found("LinkedItem", item_id))
    }

    fn find_by_external_id(&self, external_id: &str) -> Result<Option<LinkedItem>> {
        let mut conn = get_connection(&self.pool)?;

        let row = linked_items::table
            .filter(linked_items::external_id.eq(external_id))
            .select(LinkedItemDB::as_select())
            .first::<LinkedItemDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        Ok(row.map(LinkedItem::from))
    }

    fn list_for_family(&self, family_id: &str) -> Result<Vec<LinkedItem>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = linked_items::table
            .filter(linked_items::family_id.eq(family_id))
            .select(LinkedItemDB::as_select())
            .order(linked_items::created_at.asc())
            .load::<LinkedItemDB>(&mut conn)
            .into_core()?;

        Ok(rows.into_iter().map(LinkedItem::from).collect())
    }
}
