use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::cylinder::CylinderSpecs;

/// Fulfillment status of an order.
///
/// Edges: `pending -> {assigned, cancelled}`, `assigned -> {delivering,
/// cancelled}`, `delivering -> {completed}`. Completed and cancelled are
/// terminal.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OrderStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "assigned")]
    Assigned,
    #[sea_orm(string_value = "delivering")]
    Delivering,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl OrderStatus {
    /// The complete set of statuses reachable from this one in a single step.
    pub fn allowed_successors(&self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Pending => &[OrderStatus::Assigned, OrderStatus::Cancelled],
            OrderStatus::Assigned => &[OrderStatus::Delivering, OrderStatus::Cancelled],
            OrderStatus::Delivering => &[OrderStatus::Completed],
            OrderStatus::Completed | OrderStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        self.allowed_successors().contains(&target)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_successors().is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub order_no: String,
    pub customer_id: i64,
    pub courier_id: Option<i64>,
    pub specs: CylinderSpecs,
    pub quantity: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub unit_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub total_amount: Decimal,
    pub address: String,
    pub contact_name: String,
    pub contact_phone: String,
    pub remark: Option<String>,
    pub status: OrderStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub assigned_at: Option<chrono::DateTime<chrono::Utc>>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CustomerId",
        to = "super::user::Column::Id"
    )]
    Customer,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CourierId",
        to = "super::user::Column::Id"
    )]
    Courier,
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(OrderStatus::Pending, OrderStatus::Assigned, true; "pending to assigned")]
    #[test_case(OrderStatus::Pending, OrderStatus::Cancelled, true; "pending cancelled")]
    #[test_case(OrderStatus::Assigned, OrderStatus::Delivering, true; "assigned to delivering")]
    #[test_case(OrderStatus::Assigned, OrderStatus::Cancelled, true; "assigned cancelled")]
    #[test_case(OrderStatus::Delivering, OrderStatus::Completed, true; "delivering to completed")]
    #[test_case(OrderStatus::Pending, OrderStatus::Delivering, false; "pending cannot skip assignment")]
    #[test_case(OrderStatus::Pending, OrderStatus::Completed, false; "pending cannot complete")]
    #[test_case(OrderStatus::Delivering, OrderStatus::Cancelled, false; "delivering cannot cancel")]
    #[test_case(OrderStatus::Completed, OrderStatus::Pending, false; "completed is terminal")]
    #[test_case(OrderStatus::Cancelled, OrderStatus::Pending, false; "cancelled is terminal")]
    #[test_case(OrderStatus::Assigned, OrderStatus::Assigned, false; "no self loop")]
    fn transition_table(from: OrderStatus, to: OrderStatus, allowed: bool) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    #[test]
    fn terminal_states() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Assigned.is_terminal());
        assert!(!OrderStatus::Delivering.is_terminal());
    }

    #[test]
    fn status_wire_format() {
        assert_eq!(OrderStatus::Pending.to_string(), "pending");
        assert_eq!(
            serde_json::to_string(&OrderStatus::Completed).unwrap(),
            "\"completed\""
        );
        assert_eq!(
            "delivering".parse::<OrderStatus>().unwrap(),
            OrderStatus::Delivering
        );
    }
}
