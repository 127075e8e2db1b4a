//! Restaurant Settings Repository
//!
//! Single-document collection at the fixed id `restaurant:main`.

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Restaurant, RestaurantUpdate};

const TABLE: &str = "restaurant";
const KEY: &str = "main";

#[derive(Clone)]
pub struct RestaurantRepository {
    base: BaseRepository,
}

impl RestaurantRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn record_id() -> RecordId {
        RecordId::from_table_key(TABLE, KEY)
    }

    /// Read settings, falling back to defaults when the document is absent
    pub async fn get(&self) -> RepoResult<Restaurant> {
        let settings: Option<Restaurant> = self.base.db().select(Self::record_id()).await?;
        Ok(settings.unwrap_or_default())
    }

    /// Write the default document on first boot
    ///
    /// Keeps the join code stable across restarts; `get()` alone would
    /// mint a fresh one on every default read.
    pub async fn ensure_initialized(&self) -> RepoResult<Restaurant> {
        let existing: Option<Restaurant> = self.base.db().select(Self::record_id()).await?;
        if let Some(settings) = existing {
            return Ok(settings);
        }

        let created: Option<Restaurant> = self
            .base
            .db()
            .upsert(Self::record_id())
            .content(Restaurant::default())
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to initialize settings".to_string()))
    }

    /// Apply a partial update, creating the document on first write
    pub async fn update(&self, data: RestaurantUpdate) -> RepoResult<Restaurant> {
        let existing = self.get().await?;

        let settings = Restaurant {
            id: None,
            name: data.name.unwrap_or(existing.name),
            address: data.address.unwrap_or(existing.address),
            phone: data.phone.unwrap_or(existing.phone),
            gstin: data.gstin.or(existing.gstin),
            gst_rate: data.gst_rate.unwrap_or(existing.gst_rate),
            service_rate: data.service_rate.unwrap_or(existing.service_rate),
            receipt_footer: data.receipt_footer.unwrap_or(existing.receipt_footer),
            join_code: existing.join_code,
        };

        let updated: Option<Restaurant> = self
            .base
            .db()
            .upsert(Self::record_id())
            .content(settings)
            .await?;
        updated.ok_or_else(|| RepoError::Database("Failed to update settings".to_string()))
    }
}
