use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;

use ledgersync_core::errors::{Error, Result};
use ledgersync_core::families::{Family, FamilyRepositoryTrait, NewFamily};

use super::model::FamilyDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::families;

pub struct FamilyRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl FamilyRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl FamilyRepositoryTrait for FamilyRepository {
    async fn create(&self, new_family: NewFamily) -> Result<Family> {
        new_family.validate()?;

        self.writer
            .exec(move |conn| {
                let family_db: FamilyDB = new_family.into();
                diesel::insert_into(families::table)
                    .values(&family_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(family_db.into())
            })
            .await
    }

    fn get_by_id(&self, family_id: &str) -> Result<Family> {
        let mut conn = get_connection(&self.pool)?;

        families::table
            .find(family_id)
            .select(FamilyDB::as_select())
            .first::<FamilyDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .map(Family::from)
            .ok_or_else(|| Error::not_found("Family", family_id))
    }

    fn list(&self) -> Result<Vec<Family>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = families::table
            .select(FamilyDB::as_select())
            .order(families::created_at.asc())
            .load::<FamilyDB>(&mut conn)
            .into_core()?;

        Ok(rows.into_iter().map(Family::from).collect())
    }
}
