//! Database model for families.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use ledgersync_core::families::{Family, NewFamily};

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::families)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FamilyDB {
    pub id: String,
    pub name: String,
    pub currency: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<FamilyDB> for Family {
    fn from(db: FamilyDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            currency: db.currency,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewFamily> for FamilyDB {
    fn from(domain: NewFamily) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: domain
                .id
                .unwrap_or_else(|| uuid::Uuid::now_v7().to_string()),
            name: domain.name,
            currency: domain.currency,
            created_at: now,
            updated_at: now,
        }
    }
}
