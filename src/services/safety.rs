//! Delivery safety inspections.
//!
//! Records are append-only audit artifacts written by the courier performing
//! the delivery; only the remediation fields are ever updated afterwards.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument, warn};
use utoipa::{IntoParams, ToSchema};

use crate::auth::AuthContext;
use crate::db::DbPool;
use crate::entities::{order, safety_record, HazardLevel, RectifyStatus, UserRole};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSafetyRecordRequest {
    pub order_id: i64,
    #[schema(value_type = Option<Object>)]
    pub check_items: Option<Value>,
    pub hazard_level: HazardLevel,
    pub hazard_description: Option<String>,
    pub photos: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRectificationRequest {
    pub rectify_status: RectifyStatus,
    pub rectify_photos: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SafetyRecordListQuery {
    pub hazard_level: Option<HazardLevel>,
    pub order_id: Option<i64>,
}

pub struct SafetyService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl SafetyService {
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

    fn photos_json(photos: Option<Vec<String>>) -> Option<Value> {
        photos.map(|refs| Value::Array(refs.into_iter().map(Value::String).collect()))
    }

    /// Writes an inspection record with the calling actor as inspector. Any
    /// finding above `none` opens a pending remediation item.
    #[instrument(skip(self, req), fields(actor_id = ctx.actor_id, order_id = req.order_id))]
    pub async fn create_record(
        &self,
        ctx: &AuthContext,
        req: CreateSafetyRecordRequest,
    ) -> Result<safety_record::Model, ServiceError> {
        order::Entity::find_by_id(req.order_id)
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", req.order_id)))?;

        let rectify_status = req
            .hazard_level
            .requires_rectification()
            .then_some(RectifyStatus::Pending);

        let record = safety_record::ActiveModel {
            order_id: Set(req.order_id),
            inspector_id: Set(ctx.actor_id),
            check_items: Set(req.check_items),
            hazard_level: Set(req.hazard_level),
            hazard_description: Set(req.hazard_description),
            photos: Set(Self::photos_json(req.photos)),
            rectify_status: Set(rectify_status),
            rectify_photos: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db_pool.as_ref())
        .await
        .map_err(ServiceError::DatabaseError)?;

        info!(
            record_id = record.id,
            hazard_level = %record.hazard_level,
            "Safety record created"
        );
        self.emit(Event::SafetyRecordCreated {
            record_id: record.id,
            order_id: record.order_id,
            hazard_level: record.hazard_level,
        })
        .await;

        Ok(record)
    }

    /// Role-filtered listing: staff see everything, couriers their own
    /// inspections, customers the records on their orders.
    pub async fn list_records(
        &self,
        ctx: &AuthContext,
        query: SafetyRecordListQuery,
    ) -> Result<Vec<safety_record::Model>, ServiceError> {
        let mut finder = safety_record::Entity::find();

        match ctx.role {
            UserRole::Admin | UserRole::Station => {}
            UserRole::Courier => {
                finder = finder.filter(safety_record::Column::InspectorId.eq(ctx.actor_id));
            }
            UserRole::Customer => {
                finder = finder
                    .join(JoinType::InnerJoin, safety_record::Relation::Order.def())
                    .filter(order::Column::CustomerId.eq(ctx.actor_id));
            }
        }
        if let Some(level) = query.hazard_level {
            finder = finder.filter(safety_record::Column::HazardLevel.eq(level));
        }
        if let Some(order_id) = query.order_id {
            finder = finder.filter(safety_record::Column::OrderId.eq(order_id));
        }

        finder
            .order_by_desc(safety_record::Column::CreatedAt)
            .order_by_desc(safety_record::Column::Id)
            .all(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self, req))]
    pub async fn update_rectification(
        &self,
        record_id: i64,
        req: UpdateRectificationRequest,
    ) -> Result<safety_record::Model, ServiceError> {
        let record = safety_record::Entity::find_by_id(record_id)
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Safety record {} not found", record_id))
            })?;

        let mut active: safety_record::ActiveModel = record.into();
        active.rectify_status = Set(Some(req.rectify_status));
        if req.rectify_photos.is_some() {
            active.rectify_photos = Set(Self::photos_json(req.rectify_photos));
        }

        let updated = active
            .update(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?;
        info!(record_id, rectify_status = %req.rectify_status, "Rectification updated");
        Ok(updated)
    }
}
