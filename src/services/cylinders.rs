//! Cylinder records and their stock-status lifecycle.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::db::DbPool;
use crate::entities::cylinder;
use crate::entities::{CylinderSpecs, CylinderStatus};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

/// Cylinders nearing expiry within this window count as `expiring_soon`.
const EXPIRY_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCylinderRequest {
    /// Generated when absent.
    #[validate(length(min = 1, max = 64))]
    pub serial_code: Option<String>,
    pub specs: CylinderSpecs,
    #[validate(length(max = 128))]
    pub manufacturer: Option<String>,
    pub manufacture_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub last_check_date: Option<NaiveDate>,
    pub station_id: Option<i64>,
}

/// Status is deliberately absent: it only moves through the transition
/// endpoint.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCylinderRequest {
    #[validate(length(max = 128))]
    pub manufacturer: Option<String>,
    pub manufacture_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub last_check_date: Option<NaiveDate>,
    pub station_id: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdvanceCylinderStatusRequest {
    pub status: CylinderStatus,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CylinderListQuery {
    pub status: Option<CylinderStatus>,
    pub specs: Option<CylinderSpecs>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CylinderStats {
    pub total: u64,
    pub in_stock: u64,
    pub delivering: u64,
    pub in_use: u64,
    pub empty: u64,
    /// Cylinders whose expiry date falls within the next 30 days, today
    /// inclusive.
    pub expiring_soon: u64,
}

pub struct CylinderService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl CylinderService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    async fn emit(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(event).await {
                warn!("Failed to send event: {}", e);
            }
        }
    }

    async fn fetch(&self, cylinder_id: i64) -> Result<cylinder::Model, ServiceError> {
        cylinder::Entity::find_by_id(cylinder_id)
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Cylinder {} not found", cylinder_id)))
    }

    fn check_date_range(
        manufacture_date: Option<NaiveDate>,
        expiry_date: Option<NaiveDate>,
    ) -> Result<(), ServiceError> {
        if let (Some(manufactured), Some(expires)) = (manufacture_date, expiry_date) {
            if expires <= manufactured {
                return Err(ServiceError::ValidationError(
                    "expiry_date must be strictly after manufacture_date".into(),
                ));
            }
        }
        Ok(())
    }

    fn generate_serial_code() -> String {
        format!("CYL{}", Utc::now().format("%Y%m%d%H%M%S%3f"))
    }

    #[instrument(skip(self, req))]
    pub async fn create_cylinder(
        &self,
        req: CreateCylinderRequest,
    ) -> Result<cylinder::Model, ServiceError> {
        req.validate()?;
        Self::check_date_range(req.manufacture_date, req.expiry_date)?;

        let serial_code = match req.serial_code {
            Some(code) => {
                let existing = cylinder::Entity::find()
                    .filter(cylinder::Column::SerialCode.eq(code.clone()))
                    .one(self.db_pool.as_ref())
                    .await
                    .map_err(ServiceError::DatabaseError)?;
                if existing.is_some() {
                    return Err(ServiceError::Conflict(format!(
                        "serial code {} already exists",
                        code
                    )));
                }
                code
            }
            None => Self::generate_serial_code(),
        };

        let now = Utc::now();
        let cylinder = cylinder::ActiveModel {
            serial_code: Set(serial_code),
            specs: Set(req.specs),
            status: Set(CylinderStatus::InStock),
            manufacturer: Set(req.manufacturer),
            manufacture_date: Set(req.manufacture_date),
            expiry_date: Set(req.expiry_date),
            last_check_date: Set(req.last_check_date),
            station_id: Set(req.station_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.db_pool.as_ref())
        .await
        .map_err(ServiceError::DatabaseError)?;

        info!(cylinder_id = cylinder.id, serial_code = %cylinder.serial_code, "Cylinder created");
        self.emit(Event::CylinderCreated {
            cylinder_id: cylinder.id,
            specs: cylinder.specs,
        })
        .await;

        Ok(cylinder)
    }

    #[instrument(skip(self, req))]
    pub async fn update_cylinder(
        &self,
        cylinder_id: i64,
        req: UpdateCylinderRequest,
    ) -> Result<cylinder::Model, ServiceError> {
        req.validate()?;
        let cylinder = self.fetch(cylinder_id).await?;

        let manufacture_date = req.manufacture_date.or(cylinder.manufacture_date);
        let expiry_date = req.expiry_date.or(cylinder.expiry_date);
        Self::check_date_range(manufacture_date, expiry_date)?;

        let mut active: cylinder::ActiveModel = cylinder.into();
        if let Some(manufacturer) = req.manufacturer {
            active.manufacturer = Set(Some(manufacturer));
        }
        if req.manufacture_date.is_some() {
            active.manufacture_date = Set(req.manufacture_date);
        }
        if req.expiry_date.is_some() {
            active.expiry_date = Set(req.expiry_date);
        }
        if req.last_check_date.is_some() {
            active.last_check_date = Set(req.last_check_date);
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

    /// Applies one edge of the stock-status cycle. The update is guarded on
    /// the observed status so concurrent advances cannot both succeed.
    #[instrument(skip(self))]
    pub async fn advance_status(
        &self,
        cylinder_id: i64,
        target: CylinderStatus,
    ) -> Result<cylinder::Model, ServiceError> {
        let cylinder = self.fetch(cylinder_id).await?;

        if !cylinder.status.can_transition_to(target) {
            return Err(ServiceError::InvalidTransition(format!(
                "cylinder {} cannot move from {} to {}",
                cylinder_id, cylinder.status, target
            )));
        }

        let result = cylinder::Entity::update_many()
            .col_expr(cylinder::Column::Status, Expr::value(target))
            .col_expr(cylinder::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(cylinder::Column::Id.eq(cylinder_id))
            .filter(cylinder::Column::Status.eq(cylinder.status))
            .exec(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::InvalidTransition(format!(
                "cylinder {} status changed concurrently",
                cylinder_id
            )));
        }

        info!(cylinder_id, from = %cylinder.status, to = %target, "Cylinder status advanced");
        self.emit(Event::CylinderStatusChanged {
            cylinder_id,
            old_status: cylinder.status,
            new_status: target,
        })
        .await;

        self.fetch(cylinder_id).await
    }

    /// Deletes a cylinder record; only legal while it sits at the depot.
    #[instrument(skip(self))]
    pub async fn delete_cylinder(&self, cylinder_id: i64) -> Result<(), ServiceError> {
        let cylinder = self.fetch(cylinder_id).await?;
        if !cylinder.status.allows_delete() {
            return Err(ServiceError::CylinderInUse(format!(
                "cylinder {} is {} and cannot be deleted",
                cylinder_id, cylinder.status
            )));
        }

        cylinder::Entity::delete_by_id(cylinder_id)
            .exec(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?;

        info!(cylinder_id, "Cylinder deleted");
        self.emit(Event::CylinderDeleted { cylinder_id }).await;
        Ok(())
    }

    pub async fn list_cylinders(
        &self,
        query: CylinderListQuery,
    ) -> Result<Vec<cylinder::Model>, ServiceError> {
        let mut finder = cylinder::Entity::find();
        if let Some(status) = query.status {
            finder = finder.filter(cylinder::Column::Status.eq(status));
        }
        if let Some(specs) = query.specs {
            finder = finder.filter(cylinder::Column::Specs.eq(specs));
        }
        finder
            .order_by_asc(cylinder::Column::Id)
            .all(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn stats(&self) -> Result<CylinderStats, ServiceError> {
        let count_status = |status: CylinderStatus| {
            cylinder::Entity::find()
                .filter(cylinder::Column::Status.eq(status))
                .count(self.db_pool.as_ref())
        };

        let in_stock = count_status(CylinderStatus::InStock).await?;
        let delivering = count_status(CylinderStatus::Delivering).await?;
        let in_use = count_status(CylinderStatus::InUse).await?;
        let empty = count_status(CylinderStatus::Empty).await?;

        let today = Utc::now().date_naive();
        let horizon = today + Duration::days(EXPIRY_WINDOW_DAYS);
        let expiring_soon = cylinder::Entity::find()
            .filter(cylinder::Column::ExpiryDate.gte(today))
            .filter(cylinder::Column::ExpiryDate.lte(horizon))
            .count(self.db_pool.as_ref())
            .await?;

        Ok(CylinderStats {
            total: in_stock + delivering + in_use + empty,
            in_stock,
            delivering,
            in_use,
            empty,
            expiring_soon,
        })
    }
}
