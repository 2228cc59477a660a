//! Stock checking and consumption.
//!
//! Creation-time availability is a count check, not a reservation: no
//! cylinder rows are mutated or tagged, and two concurrent orders can both
//! pass against the same stock. Completion-time consumption runs inside the
//! completing order's transaction and never fails on shortfall.
//!
//! Both operations take the caller's connection so they compose with an
//! open transaction.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use tracing::{info, instrument};

use crate::entities::cylinder;
use crate::entities::{CylinderSpecs, CylinderStatus};
use crate::errors::ServiceError;

/// Count of in-stock cylinders of the given weight class.
pub async fn count_in_stock<C: ConnectionTrait>(
    conn: &C,
    specs: CylinderSpecs,
) -> Result<u64, ServiceError> {
    cylinder::Entity::find()
        .filter(cylinder::Column::Specs.eq(specs))
        .filter(cylinder::Column::Status.eq(CylinderStatus::InStock))
        .count(conn)
        .await
        .map_err(ServiceError::DatabaseError)
}

/// Completion-time consumption: flips up to `quantity` in-stock cylinders
/// of the class to `in_use`, picking in ascending-id order. Returns the
/// count actually transitioned; a shortfall is not an error.
#[instrument(skip(conn))]
pub async fn consume_for_completion<C: ConnectionTrait>(
    conn: &C,
    specs: CylinderSpecs,
    quantity: i32,
) -> Result<u64, ServiceError> {
    let picks = cylinder::Entity::find()
        .filter(cylinder::Column::Specs.eq(specs))
        .filter(cylinder::Column::Status.eq(CylinderStatus::InStock))
        .order_by_asc(cylinder::Column::Id)
        .limit(quantity.max(0) as u64)
        .all(conn)
        .await
        .map_err(ServiceError::DatabaseError)?;

    let now = Utc::now();
    let mut transitioned = 0u64;
    for picked in picks {
        let mut active: cylinder::ActiveModel = picked.into();
        active.status = Set(CylinderStatus::InUse);
        active.updated_at = Set(now);
        active
            .update(conn)
            .await
            .map_err(ServiceError::DatabaseError)?;
        transitioned += 1;
    }

    info!(%specs, quantity, transitioned, "Consumed stock for completion");
    Ok(transitioned)
}
