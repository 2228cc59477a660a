//! Read-only aggregation queries feeding the dashboard. No write-path
//! coupling; everything here tolerates an empty database.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::entities::{cylinder, order, user, CylinderStatus, OrderStatus, UserRole};
use crate::errors::ServiceError;

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderCounts {
    pub pending: u64,
    pub assigned: u64,
    pub delivering: u64,
    pub completed: u64,
    pub cancelled: u64,
    pub total: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CylinderCounts {
    pub in_stock: u64,
    pub delivering: u64,
    pub in_use: u64,
    pub empty: u64,
    pub total: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    pub orders: OrderCounts,
    pub cylinders: CylinderCounts,
    pub customers: u64,
    pub couriers: u64,
    pub today_orders: u64,
    pub today_revenue: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourierRank {
    pub courier_id: i64,
    pub username: String,
    pub real_name: Option<String>,
    pub completed_count: u64,
}

pub struct AnalyticsService {
    db_pool: Arc<DbPool>,
}

impl AnalyticsService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    fn start_of_today() -> DateTime<Utc> {
        Utc::now()
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .expect("midnight is a valid time")
            .and_utc()
    }

    async fn count_orders(&self, status: OrderStatus) -> Result<u64, ServiceError> {
        order::Entity::find()
            .filter(order::Column::Status.eq(status))
            .count(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    async fn count_cylinders(&self, status: CylinderStatus) -> Result<u64, ServiceError> {
        cylinder::Entity::find()
            .filter(cylinder::Column::Status.eq(status))
            .count(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    async fn count_users(&self, role: UserRole) -> Result<u64, ServiceError> {
        user::Entity::find()
            .filter(user::Column::Role.eq(role))
            .count(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> Result<DashboardStats, ServiceError> {
        let pending = self.count_orders(OrderStatus::Pending).await?;
        let assigned = self.count_orders(OrderStatus::Assigned).await?;
        let delivering = self.count_orders(OrderStatus::Delivering).await?;
        let completed = self.count_orders(OrderStatus::Completed).await?;
        let cancelled = self.count_orders(OrderStatus::Cancelled).await?;
        let orders = OrderCounts {
            pending,
            assigned,
            delivering,
            completed,
            cancelled,
            total: pending + assigned + delivering + completed + cancelled,
        };

        let in_stock = self.count_cylinders(CylinderStatus::InStock).await?;
        let cyl_delivering = self.count_cylinders(CylinderStatus::Delivering).await?;
        let in_use = self.count_cylinders(CylinderStatus::InUse).await?;
        let empty = self.count_cylinders(CylinderStatus::Empty).await?;
        let cylinders = CylinderCounts {
            in_stock,
            delivering: cyl_delivering,
            in_use,
            empty,
            total: in_stock + cyl_delivering + in_use + empty,
        };

        let today_start = Self::start_of_today();
        let today_orders = order::Entity::find()
            .filter(order::Column::CreatedAt.gte(today_start))
            .count(self.db_pool.as_ref())
            .await?;

        let today_completed = order::Entity::find()
            .filter(order::Column::Status.eq(OrderStatus::Completed))
            .filter(order::Column::CompletedAt.gte(today_start))
            .all(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?;
        let today_revenue = today_completed
            .iter()
            .fold(Decimal::ZERO, |sum, o| sum + o.total_amount);

        Ok(DashboardStats {
            orders,
            cylinders,
            customers: self.count_users(UserRole::Customer).await?,
            couriers: self.count_users(UserRole::Courier).await?,
            today_orders,
            today_revenue,
        })
    }

    /// Daily order counts over the trailing `days` window ending today.
    /// Missing days are zero-filled, so the output length always equals
    /// `days`, in ascending date order. A zero-day window is empty.
    #[instrument(skip(self))]
    pub async fn order_trend(&self, days: u32) -> Result<Vec<TrendPoint>, ServiceError> {
        if days == 0 {
            return Ok(Vec::new());
        }
        let today = Utc::now().date_naive();
        let window_start = today - Duration::days(i64::from(days) - 1);
        let window_start_at = window_start
            .and_hms_opt(0, 0, 0)
            .expect("midnight is a valid time")
            .and_utc();

        let recent = order::Entity::find()
            .filter(order::Column::CreatedAt.gte(window_start_at))
            .all(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?;

        let mut buckets: HashMap<NaiveDate, u64> = HashMap::new();
        for order in recent {
            *buckets.entry(order.created_at.date_naive()).or_insert(0) += 1;
        }

        let trend = (0..days)
            .map(|offset| {
                let date = window_start + Duration::days(i64::from(offset));
                TrendPoint {
                    date,
                    count: buckets.get(&date).copied().unwrap_or(0),
                }
            })
            .collect();

        Ok(trend)
    }

    /// Top couriers by completed-order count, descending; ties break by
    /// ascending courier id. Length never exceeds `limit`.
    #[instrument(skip(self))]
    pub async fn courier_ranking(&self, limit: u32) -> Result<Vec<CourierRank>, ServiceError> {
        let completed = order::Entity::find()
            .filter(order::Column::Status.eq(OrderStatus::Completed))
            .filter(order::Column::CourierId.is_not_null())
            .all(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?;

        let mut counts: HashMap<i64, u64> = HashMap::new();
        for order in completed {
            if let Some(courier_id) = order.courier_id {
                *counts.entry(courier_id).or_insert(0) += 1;
            }
        }

        let courier_ids: Vec<i64> = counts.keys().copied().collect();
        let couriers = user::Entity::find()
            .filter(user::Column::Id.is_in(courier_ids))
            .all(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?;
        let names: HashMap<i64, (String, Option<String>)> = couriers
            .into_iter()
            .map(|u| (u.id, (u.username, u.real_name)))
            .collect();

        let mut ranking: Vec<CourierRank> = counts
            .into_iter()
            .map(|(courier_id, completed_count)| {
                let (username, real_name) = names
                    .get(&courier_id)
                    .cloned()
                    .unwrap_or_else(|| (format!("user-{}", courier_id), None));
                CourierRank {
                    courier_id,
                    username,
                    real_name,
                    completed_count,
                }
            })
            .collect();
        ranking.sort_by(|a, b| {
            b.completed_count
                .cmp(&a.completed_count)
                .then(a.courier_id.cmp(&b.courier_id))
        });
        ranking.truncate(limit as usize);

        Ok(ranking)
    }
}
