//! Order ratings: one per order, written by the ordering customer once the
//! order has completed.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::auth::policy::{self, Action, AdvancePolicy, OrderParties};
use crate::auth::AuthContext;
use crate::db::DbPool;
use crate::entities::{order, rating, OrderStatus};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

fn default_score() -> i16 {
    5
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRatingRequest {
    pub order_id: i64,
    #[serde(default = "default_score")]
    #[validate(range(min = 1, max = 5))]
    pub score: i16,
    #[validate(length(max = 512))]
    pub comment: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct RatingListQuery {
    pub order_id: Option<i64>,
}

pub struct RatingService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
    policy: AdvancePolicy,
}

impl RatingService {
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Option<Arc<EventSender>>,
        policy: AdvancePolicy,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            policy,
        }
    }

    async fn emit(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(event).await {
                warn!("Failed to send event: {}", e);
            }
        }
    }

    async fn fetch_order(&self, order_id: i64) -> Result<order::Model, ServiceError> {
        order::Entity::find_by_id(order_id)
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))
    }

    #[instrument(skip(self, req), fields(actor_id = ctx.actor_id, order_id = req.order_id))]
    pub async fn create_rating(
        &self,
        ctx: &AuthContext,
        req: CreateRatingRequest,
    ) -> Result<rating::Model, ServiceError> {
        req.validate()?;

        let order = self.fetch_order(req.order_id).await?;
        policy::ensure(
            ctx,
            Action::RateOrder(OrderParties {
                customer_id: order.customer_id,
                courier_id: order.courier_id,
            }),
            self.policy,
        )?;

        if order.status != OrderStatus::Completed {
            return Err(ServiceError::InvalidState(format!(
                "order {} is {}, only completed orders can be rated",
                order.id, order.status
            )));
        }

        let existing = rating::Entity::find()
            .filter(rating::Column::OrderId.eq(order.id))
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "order {} is already rated",
                order.id
            )));
        }

        let rating = rating::ActiveModel {
            order_id: Set(order.id),
            customer_id: Set(ctx.actor_id),
            score: Set(req.score),
            comment: Set(req.comment),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db_pool.as_ref())
        .await
        .map_err(ServiceError::DatabaseError)?;

        info!(rating_id = rating.id, score = rating.score, "Rating created");
        self.emit(Event::RatingCreated {
            rating_id: rating.id,
            order_id: rating.order_id,
            score: rating.score,
        })
        .await;

        Ok(rating)
    }

    /// The rating of one order, visible to staff and both owning parties.
    pub async fn get_for_order(
        &self,
        ctx: &AuthContext,
        order_id: i64,
    ) -> Result<rating::Model, ServiceError> {
        let order = self.fetch_order(order_id).await?;
        policy::ensure(
            ctx,
            Action::ViewOrder(OrderParties {
                customer_id: order.customer_id,
                courier_id: order.courier_id,
            }),
            self.policy,
        )?;

        rating::Entity::find()
            .filter(rating::Column::OrderId.eq(order_id))
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} has no rating", order_id)))
    }

    pub async fn list_ratings(
        &self,
        query: RatingListQuery,
    ) -> Result<Vec<rating::Model>, ServiceError> {
        let mut finder = rating::Entity::find();
        if let Some(order_id) = query.order_id {
            finder = finder.filter(rating::Column::OrderId.eq(order_id));
        }
        finder
            .order_by_desc(rating::Column::CreatedAt)
            .order_by_desc(rating::Column::Id)
            .all(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)
    }
}
