//! The authorization matrix.
//!
//! A stateless mapping from (actor role, actor id, resource ownership,
//! action) to allow/deny, evaluated before every lifecycle operation. The
//! matrix itself has no side effects and no database access, so it can be
//! exercised in isolation.

use crate::auth::AuthContext;
use crate::entities::UserRole;
use crate::errors::ServiceError;

/// Who may advance an order's status.
///
/// `Permissive` preserves the historical behavior: any authenticated actor
/// may advance any order. `AssigneeOnly` restricts couriers to orders
/// assigned to them; admin and station actors are always allowed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AdvancePolicy {
    Permissive,
    AssigneeOnly,
}

/// Ownership facts about an order, used for owner-sensitive actions.
#[derive(Copy, Clone, Debug)]
pub struct OrderParties {
    pub customer_id: i64,
    pub courier_id: Option<i64>,
}

/// Everything the matrix gates.
#[derive(Copy, Clone, Debug)]
pub enum Action {
    /// Create, edit or delete cylinder records
    ManageCylinders,
    AdvanceCylinderStatus,
    /// Always as self
    CreateOrder,
    ViewOrder(OrderParties),
    AssignOrder,
    AdvanceOrderStatus(OrderParties),
    CreateSafetyRecord,
    /// Update remediation status/photos on an inspection record
    ManageSafetyRecords,
    ViewUsers,
    ManageUsers,
    ManageAnnouncements,
    RateOrder(OrderParties),
}

fn is_staff(role: UserRole) -> bool {
    matches!(role, UserRole::Admin | UserRole::Station)
}

/// The matrix itself.
pub fn allow(role: UserRole, actor_id: i64, action: Action, policy: AdvancePolicy) -> bool {
    match action {
        Action::ManageCylinders | Action::AssignOrder | Action::ManageSafetyRecords => {
            is_staff(role)
        }
        Action::AdvanceCylinderStatus | Action::CreateOrder | Action::CreateSafetyRecord => true,
        Action::ViewOrder(parties) => {
            is_staff(role)
                || parties.customer_id == actor_id
                || parties.courier_id == Some(actor_id)
        }
        Action::AdvanceOrderStatus(parties) => match policy {
            AdvancePolicy::Permissive => true,
            AdvancePolicy::AssigneeOnly => is_staff(role) || parties.courier_id == Some(actor_id),
        },
        Action::ViewUsers => is_staff(role),
        Action::ManageUsers | Action::ManageAnnouncements => role == UserRole::Admin,
        Action::RateOrder(parties) => parties.customer_id == actor_id,
    }
}

/// Matrix check as a `Result`, for use on the request path.
pub fn ensure(ctx: &AuthContext, action: Action, policy: AdvancePolicy) -> Result<(), ServiceError> {
    if allow(ctx.role, ctx.actor_id, action, policy) {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(format!(
            "role {} may not perform this action",
            ctx.role
        )))
    }
}
