//! SeaORM-backed repository implementation for the domain port.
//!
//! Generic over `C: ConnectionTrait`, so it works with a `DatabaseConnection`
//! or a transaction.

use anyhow::Context;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr,
};
use tracing::debug;

use crate::contract::model::Guest;
use crate::domain::repo::{GuestRecord, GuestsRepository, StoreError};
use crate::infra::storage::entity::{ActiveModel as GuestAM, Column, Entity as GuestEntity};

pub struct SeaOrmGuestsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmGuestsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[async_trait::async_trait]
impl<C> GuestsRepository for SeaOrmGuestsRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn identifier_exists(&self, identifier: &str) -> Result<bool, StoreError> {
        let count = GuestEntity::find()
            .filter(Column::Identifier.eq(identifier))
            .count(&self.conn)
            .await
            .context("identifier_exists failed")?;
        Ok(count > 0)
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Guest>, StoreError> {
        let found = GuestEntity::find()
            .filter(Column::Identifier.eq(identifier))
            .one(&self.conn)
            .await
            .context("find_by_identifier failed")?;
        Ok(found.map(Into::into))
    }

    async fn insert(&self, record: GuestRecord) -> Result<Guest, StoreError> {
        let identifier = record.identifier.clone();
        let m = GuestAM {
            id: NotSet,
            name: Set(record.name),
            place: Set(record.place),
            identifier: Set(record.identifier),
            checked_in: Set(record.checked_in),
            created_at: Set(record.created_at),
            updated_at: Set(record.updated_at),
        };
        match m.insert(&self.conn).await {
            Ok(saved) => Ok(saved.into()),
            Err(e) if is_unique_violation(&e) => Err(StoreError::DuplicateIdentifier(identifier)),
            Err(e) => Err(anyhow::Error::new(e).context("insert failed").into()),
        }
    }

    async fn list_by_creation(&self) -> Result<Vec<Guest>, StoreError> {
        let rows = GuestEntity::find()
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&self.conn)
            .await
            .context("list_by_creation failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn mark_checked_in(
        &self,
        identifier: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Guest>, StoreError> {
        // Single conditional UPDATE; racing check-ins see at most one transition.
        let res = GuestEntity::update_many()
            .col_expr(Column::CheckedIn, Expr::value(true))
            .col_expr(Column::UpdatedAt, Expr::value(at))
            .filter(Column::Identifier.eq(identifier))
            .filter(Column::CheckedIn.eq(false))
            .exec(&self.conn)
            .await
            .context("mark_checked_in failed")?;
        debug!(rows_affected = res.rows_affected, "check-in update executed");

        self.find_by_identifier(identifier).await
    }
}
