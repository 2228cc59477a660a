use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Weight class of a cylinder. Prices are fixed per class.
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
pub enum CylinderSpecs {
    #[sea_orm(string_value = "5kg")]
    #[serde(rename = "5kg")]
    #[strum(serialize = "5kg")]
    Kg5,
    #[sea_orm(string_value = "15kg")]
    #[serde(rename = "15kg")]
    #[strum(serialize = "15kg")]
    Kg15,
    #[sea_orm(string_value = "50kg")]
    #[serde(rename = "50kg")]
    #[strum(serialize = "50kg")]
    Kg50,
}

impl CylinderSpecs {
    /// Unit price charged per cylinder of this class.
    pub fn unit_price(&self) -> Decimal {
        match self {
            CylinderSpecs::Kg5 => dec!(50),
            CylinderSpecs::Kg15 => dec!(120),
            CylinderSpecs::Kg50 => dec!(350),
        }
    }
}

/// Stock status of a physical cylinder.
///
/// The legal lifecycle is the closed cycle
/// `in_stock -> delivering -> in_use -> empty -> in_stock`, plus
/// `delivering -> in_stock` when a delivery is aborted.
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
pub enum CylinderStatus {
    #[sea_orm(string_value = "in_stock")]
    InStock,
    #[sea_orm(string_value = "delivering")]
    Delivering,
    #[sea_orm(string_value = "in_use")]
    InUse,
    #[sea_orm(string_value = "empty")]
    Empty,
}

impl CylinderStatus {
    /// The complete set of statuses reachable from this one in a single step.
    pub fn allowed_successors(&self) -> &'static [CylinderStatus] {
        match self {
            CylinderStatus::InStock => &[CylinderStatus::Delivering],
            CylinderStatus::Delivering => &[CylinderStatus::InUse, CylinderStatus::InStock],
            CylinderStatus::InUse => &[CylinderStatus::Empty],
            CylinderStatus::Empty => &[CylinderStatus::InStock],
        }
    }

    pub fn can_transition_to(&self, target: CylinderStatus) -> bool {
        self.allowed_successors().contains(&target)
    }

    /// Cylinders out with a courier or at a customer must not be deleted.
    pub fn allows_delete(&self) -> bool {
        matches!(self, CylinderStatus::InStock | CylinderStatus::Empty)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "cylinders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub serial_code: String,
    pub specs: CylinderSpecs,
    pub status: CylinderStatus,
    pub manufacturer: Option<String>,
    pub manufacture_date: Option<Date>,
    pub expiry_date: Option<Date>,
    pub last_check_date: Option<Date>,
    pub station_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StationId",
        to = "super::user::Column::Id"
    )]
    Station,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Station.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
