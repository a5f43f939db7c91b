//! Database model for linked items.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use ledgersync_core::items::{LinkedItem, LinkedItemStatus, NewLinkedItem};
use ledgersync_core::providers::Product;

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Clone)]
#[diesel(table_name = crate::schema::linked_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LinkedItemDB {
    pub id: String,
    pub family_id: String,
    pub provider: String,
    pub external_id: String,
    pub access_token: String,
    pub name: String,
    pub status: String,
    /// JSON array of product names.
    pub products: String,
    pub institution_id: Option<String>,
    pub institution_url: Option<String>,
    pub logo_url: Option<String>,
    pub brand_color: Option<String>,
    pub cursor: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

pub fn products_to_json(products: &[Product]) -> String {
    serde_json::to_string(products).unwrap_or_else(|_| "[]".to_string())
}

impl From<LinkedItemDB> for LinkedItem {
    fn from(db: LinkedItemDB) -> Self {
        let status = LinkedItemStatus::parse(&db.status).unwrap_or_else(|e| {
            log::warn!("Linked item {} has an unreadable status: {}", db.id, e);
            LinkedItemStatus::Error
        });
        let products: Vec<Product> = serde_json::from_str(&db.products).unwrap_or_default();

        Self {
            id: db.id,
            family_id: db.family_id,
            provider: db.provider,
            external_id: db.external_id,
            access_token: db.access_token,
            name: db.name,
            status,
            products,
            institution_id: db.institution_id,
            institution_url: db.institution_url,
            logo_url: db.logo_url,
            brand_color: db.brand_color,
            cursor: db.cursor,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewLinkedItem> for LinkedItemDB {
    fn from(domain: NewLinkedItem) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            family_id: domain.family_id,
            provider: domain.provider,
            external_id: domain.external_id,
            access_token: domain.access_token,
            name: domain.name,
            status: LinkedItemStatus::Good.as_str().to_string(),
            products: "[]".to_string(),
            institution_id: None,
            institution_url: None,
            logo_url: None,
            brand_color: None,
            cursor: None,
            created_at: now,
            updated_at: now,
        }
    }
}
