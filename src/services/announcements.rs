//! Station announcements. Pinned entries list first, then newest first.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::AuthContext;
use crate::db::DbPool;
use crate::entities::announcement;
use crate::errors::ServiceError;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAnnouncementRequest {
    #[validate(length(min = 1, max = 128))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    #[serde(default)]
    pub is_top: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAnnouncementRequest {
    #[validate(length(min = 1, max = 128))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub content: Option<String>,
    pub is_top: Option<bool>,
}

pub struct AnnouncementService {
    db_pool: Arc<DbPool>,
}

impl AnnouncementService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    async fn fetch(&self, announcement_id: i64) -> Result<announcement::Model, ServiceError> {
        announcement::Entity::find_by_id(announcement_id)
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Announcement {} not found", announcement_id))
            })
    }

    #[instrument(skip(self, req), fields(actor_id = ctx.actor_id))]
    pub async fn create_announcement(
        &self,
        ctx: &AuthContext,
        req: CreateAnnouncementRequest,
    ) -> Result<announcement::Model, ServiceError> {
        req.validate()?;

        let now = Utc::now();
        let announcement = announcement::ActiveModel {
            title: Set(req.title),
            content: Set(req.content),
            author_id: Set(ctx.actor_id),
            is_top: Set(req.is_top),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.db_pool.as_ref())
        .await
        .map_err(ServiceError::DatabaseError)?;

        info!(announcement_id = announcement.id, "Announcement created");
        Ok(announcement)
    }

    #[instrument(skip(self, req))]
    pub async fn update_announcement(
        &self,
        announcement_id: i64,
        req: UpdateAnnouncementRequest,
    ) -> Result<announcement::Model, ServiceError> {
        req.validate()?;
        let announcement = self.fetch(announcement_id).await?;

        let mut active: announcement::ActiveModel = announcement.into();
        if let Some(title) = req.title {
            active.title = Set(title);
        }
        if let Some(content) = req.content {
            active.content = Set(content);
        }
        if let Some(is_top) = req.is_top {
            active.is_top = Set(is_top);
        }
        active.updated_at = Set(Utc::now());

        active
            .update(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn delete_announcement(&self, announcement_id: i64) -> Result<(), ServiceError> {
        self.fetch(announcement_id).await?;
        announcement::Entity::delete_by_id(announcement_id)
            .exec(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?;
        info!(announcement_id, "Announcement deleted");
        Ok(())
    }

    pub async fn list_announcements(&self) -> Result<Vec<announcement::Model>, ServiceError> {
        announcement::Entity::find()
            .order_by_desc(announcement::Column::IsTop)
            .order_by_desc(announcement::Column::CreatedAt)
            .order_by_desc(announcement::Column::Id)
            .all(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)
    }
}
