//! Order lifecycle: creation, courier assignment, status advancement.
//!
//! Every status write is a conditional update guarded on the status the
//! caller observed; a concurrent transition makes the guard miss
//! (`rows_affected == 0`) and the request fails the edge check instead of
//! clobbering the newer state.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::{info, instrument, warn};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::auth::policy::{self, Action, AdvancePolicy, OrderParties};
use crate::auth::AuthContext;
use crate::db::DbPool;
use crate::entities::{order, user, CylinderSpecs, OrderStatus, UserRole};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::inventory;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    pub specs: CylinderSpecs,
    #[validate(range(min = 1))]
    pub quantity: i32,
    #[validate(length(min = 1, max = 255))]
    pub address: String,
    #[validate(length(min = 1, max = 64))]
    pub contact_name: String,
    #[validate(custom = "crate::services::validate_phone")]
    pub contact_phone: String,
    pub remark: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignOrderRequest {
    pub courier_id: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdvanceOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
}

pub struct OrderService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
    policy: AdvancePolicy,
}

impl OrderService {
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

    fn generate_order_no() -> String {
        let uuid = Uuid::new_v4().simple().to_string();
        format!(
            "ORD{}{}",
            Utc::now().format("%Y%m%d%H%M%S"),
            uuid[..4].to_uppercase()
        )
    }

    async fn emit(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(event).await {
                warn!("Failed to send event: {}", e);
            }
        }
    }

    async fn fetch(&self, order_id: i64) -> Result<order::Model, ServiceError> {
        order::Entity::find_by_id(order_id)
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))
    }

    fn parties(order: &order::Model) -> OrderParties {
        OrderParties {
            customer_id: order.customer_id,
            courier_id: order.courier_id,
        }
    }

    /// Creates a pending order owned by the calling actor. The stock check is
    /// a snapshot count, not a reservation.
    #[instrument(skip(self, req), fields(actor_id = ctx.actor_id))]
    pub async fn create_order(
        &self,
        ctx: &AuthContext,
        req: CreateOrderRequest,
    ) -> Result<order::Model, ServiceError> {
        req.validate()?;
        policy::ensure(ctx, Action::CreateOrder, self.policy)?;

        let unit_price = req.specs.unit_price();
        let total_amount = unit_price * Decimal::from(req.quantity);
        let now = Utc::now();

        let txn = self
            .db_pool
            .begin()
            .await
            .map_err(ServiceError::DatabaseError)?;

        let available = inventory::count_in_stock(&txn, req.specs).await?;
        if available < req.quantity as u64 {
            return Err(ServiceError::InsufficientStock(format!(
                "only {} of {} in stock, requested {}",
                available, req.specs, req.quantity
            )));
        }

        let order = order::ActiveModel {
            order_no: Set(Self::generate_order_no()),
            customer_id: Set(ctx.actor_id),
            courier_id: Set(None),
            specs: Set(req.specs),
            quantity: Set(req.quantity),
            unit_price: Set(unit_price),
            total_amount: Set(total_amount),
            address: Set(req.address),
            contact_name: Set(req.contact_name),
            contact_phone: Set(req.contact_phone),
            remark: Set(req.remark),
            status: Set(OrderStatus::Pending),
            created_at: Set(now),
            assigned_at: Set(None),
            completed_at: Set(None),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::DatabaseError)?;

        txn.commit().await.map_err(ServiceError::DatabaseError)?;

        info!(order_id = order.id, order_no = %order.order_no, "Order created");
        self.emit(Event::OrderCreated {
            order_id: order.id,
            customer_id: order.customer_id,
            specs: order.specs,
            quantity: order.quantity,
        })
        .await;

        Ok(order)
    }

    /// Assigns a courier to a pending order.
    #[instrument(skip(self), fields(actor_id = ctx.actor_id))]
    pub async fn assign_order(
        &self,
        ctx: &AuthContext,
        order_id: i64,
        courier_id: i64,
    ) -> Result<order::Model, ServiceError> {
        policy::ensure(ctx, Action::AssignOrder, self.policy)?;

        let order = self.fetch(order_id).await?;
        if order.status != OrderStatus::Pending {
            return Err(ServiceError::InvalidState(format!(
                "order {} is {}, assignment requires pending",
                order_id, order.status
            )));
        }

        let courier = user::Entity::find_by_id(courier_id)
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::InvalidAssignee(format!("user {} not found", courier_id))
            })?;
        if courier.role != UserRole::Courier {
            return Err(ServiceError::InvalidAssignee(format!(
                "user {} has role {}, expected courier",
                courier_id, courier.role
            )));
        }

        let now = Utc::now();
        let result = order::Entity::update_many()
            .col_expr(order::Column::CourierId, Expr::value(Some(courier_id)))
            .col_expr(order::Column::Status, Expr::value(OrderStatus::Assigned))
            .col_expr(order::Column::AssignedAt, Expr::value(Some(now)))
            .col_expr(order::Column::UpdatedAt, Expr::value(now))
            .filter(order::Column::Id.eq(order_id))
            .filter(order::Column::Status.eq(OrderStatus::Pending))
            .exec(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::InvalidState(format!(
                "order {} is no longer pending",
                order_id
            )));
        }

        info!(order_id, courier_id, "Order assigned");
        self.emit(Event::OrderAssigned {
            order_id,
            courier_id,
        })
        .await;
        self.emit(Event::OrderStatusChanged {
            order_id,
            old_status: OrderStatus::Pending,
            new_status: OrderStatus::Assigned,
        })
        .await;

        self.fetch(order_id).await
    }

    /// Applies one edge of the order status table. Entering `completed`
    /// consumes matching stock within the same transaction.
    #[instrument(skip(self), fields(actor_id = ctx.actor_id))]
    pub async fn advance_status(
        &self,
        ctx: &AuthContext,
        order_id: i64,
        target: OrderStatus,
    ) -> Result<order::Model, ServiceError> {
        let order = self.fetch(order_id).await?;
        policy::ensure(
            ctx,
            Action::AdvanceOrderStatus(Self::parties(&order)),
            self.policy,
        )?;

        if !order.status.can_transition_to(target) {
            return Err(ServiceError::InvalidTransition(format!(
                "order {} cannot move from {} to {}",
                order_id, order.status, target
            )));
        }

        let now = Utc::now();
        let txn = self
            .db_pool
            .begin()
            .await
            .map_err(ServiceError::DatabaseError)?;

        let mut update = order::Entity::update_many()
            .col_expr(order::Column::Status, Expr::value(target))
            .col_expr(order::Column::UpdatedAt, Expr::value(now))
            .filter(order::Column::Id.eq(order_id))
            .filter(order::Column::Status.eq(order.status));
        if target == OrderStatus::Completed {
            update = update.col_expr(order::Column::CompletedAt, Expr::value(Some(now)));
        }
        let result = update.exec(&txn).await.map_err(ServiceError::DatabaseError)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::InvalidTransition(format!(
                "order {} status changed concurrently",
                order_id
            )));
        }

        let allocated = if target == OrderStatus::Completed {
            inventory::consume_for_completion(&txn, order.specs, order.quantity).await?
        } else {
            0
        };

        txn.commit().await.map_err(ServiceError::DatabaseError)?;

        info!(order_id, from = %order.status, to = %target, "Order status advanced");
        self.emit(Event::OrderStatusChanged {
            order_id,
            old_status: order.status,
            new_status: target,
        })
        .await;
        if target == OrderStatus::Completed {
            self.emit(Event::OrderCompleted {
                order_id,
                cylinders_allocated: allocated,
            })
            .await;
        }

        self.fetch(order_id).await
    }

    /// Fetches a single order, visible to staff and both owning parties.
    pub async fn get_order(
        &self,
        ctx: &AuthContext,
        order_id: i64,
    ) -> Result<order::Model, ServiceError> {
        let order = self.fetch(order_id).await?;
        policy::ensure(ctx, Action::ViewOrder(Self::parties(&order)), self.policy)?;
        Ok(order)
    }

    /// Role-filtered listing: staff see everything, customers their own
    /// orders, couriers their assignments.
    pub async fn list_orders(
        &self,
        ctx: &AuthContext,
        query: OrderListQuery,
    ) -> Result<Vec<order::Model>, ServiceError> {
        let mut finder = order::Entity::find();

        match ctx.role {
            UserRole::Admin | UserRole::Station => {}
            UserRole::Customer => {
                finder = finder.filter(order::Column::CustomerId.eq(ctx.actor_id));
            }
            UserRole::Courier => {
                finder = finder.filter(order::Column::CourierId.eq(ctx.actor_id));
            }
        }
        if let Some(status) = query.status {
            finder = finder.filter(order::Column::Status.eq(status));
        }

        finder
            .order_by_desc(order::Column::CreatedAt)
            .order_by_desc(order::Column::Id)
            .all(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_numbers_have_fixed_shape() {
        let order_no = OrderService::generate_order_no();
        assert_eq!(order_no.len(), 3 + 14 + 4);
        assert!(order_no.starts_with("ORD"));
        assert!(order_no[3..17].chars().all(|c| c.is_ascii_digit()));
        assert!(order_no[17..]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }
}
