//! User directory.
//!
//! Rows here are directory entries referenced by orders and cylinders;
//! credentials and sessions live in the external identity service.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::db::DbPool;
use crate::entities::user;
use crate::entities::UserRole;
use crate::errors::ServiceError;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    pub role: UserRole,
    #[validate(custom = "crate::services::validate_phone")]
    pub phone: Option<String>,
    #[validate(length(max = 64))]
    pub real_name: Option<String>,
    pub station_id: Option<i64>,
}

/// Username is immutable once created.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    pub role: Option<UserRole>,
    #[validate(custom = "crate::services::validate_phone")]
    pub phone: Option<String>,
    #[validate(length(max = 64))]
    pub real_name: Option<String>,
    pub station_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct UserListQuery {
    pub role: Option<UserRole>,
}

pub struct UserService {
    db_pool: Arc<DbPool>,
}

impl UserService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    async fn fetch(&self, user_id: i64) -> Result<user::Model, ServiceError> {
        user::Entity::find_by_id(user_id)
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", user_id)))
    }

    #[instrument(skip(self, req))]
    pub async fn create_user(&self, req: CreateUserRequest) -> Result<user::Model, ServiceError> {
        req.validate()?;

        let existing = user::Entity::find()
            .filter(user::Column::Username.eq(req.username.clone()))
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "username {} already exists",
                req.username
            )));
        }

        let now = Utc::now();
        let user = user::ActiveModel {
            username: Set(req.username),
            role: Set(req.role),
            phone: Set(req.phone),
            real_name: Set(req.real_name),
            station_id: Set(req.station_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.db_pool.as_ref())
        .await
        .map_err(ServiceError::DatabaseError)?;

        info!(user_id = user.id, username = %user.username, role = %user.role, "User created");
        Ok(user)
    }

    #[instrument(skip(self, req))]
    pub async fn update_user(
        &self,
        user_id: i64,
        req: UpdateUserRequest,
    ) -> Result<user::Model, ServiceError> {
        req.validate()?;
        let user = self.fetch(user_id).await?;

        let mut active: user::ActiveModel = user.into();
        if let Some(role) = req.role {
            active.role = Set(role);
        }
        if req.phone.is_some() {
            active.phone = Set(req.phone);
        }
        if req.real_name.is_some() {
            active.real_name = Set(req.real_name);
        }
        if req.station_id.is_some() {
            active.station_id = Set(req.station_id);
        }
        active.updated_at = Set(Utc::now());

        active
            .update(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, user_id: i64) -> Result<(), ServiceError> {
        self.fetch(user_id).await?;
        user::Entity::delete_by_id(user_id)
            .exec(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?;
        info!(user_id, "User deleted");
        Ok(())
    }

    pub async fn get_user(&self, user_id: i64) -> Result<user::Model, ServiceError> {
        self.fetch(user_id).await
    }

    pub async fn list_users(&self, query: UserListQuery) -> Result<Vec<user::Model>, ServiceError> {
        let mut finder = user::Entity::find();
        if let Some(role) = query.role {
            finder = finder.filter(user::Column::Role.eq(role));
        }
        finder
            .order_by_asc(user::Column::Id)
            .all(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)
    }
}
