//! HTTP handlers, one module per resource.
//!
//! Handlers authenticate via the [`AuthContext`](crate::auth::AuthContext)
//! extractor, apply coarse role checks through the authorization matrix, and
//! delegate to services. Ownership-sensitive checks that need row data live
//! in the services themselves.

pub mod announcements;
pub mod cylinders;
pub mod orders;
pub mod ratings;
pub mod safety;
pub mod stats;
pub mod users;

use std::sync::Arc;

use crate::auth::policy::AdvancePolicy;
use crate::db::DbPool;
use crate::events::EventSender;
use crate::services::analytics::AnalyticsService;
use crate::services::announcements::AnnouncementService;
use crate::services::cylinders::CylinderService;
use crate::services::orders::OrderService;
use crate::services::ratings::RatingService;
use crate::services::safety::SafetyService;
use crate::services::users::UserService;

/// Every service the handlers reach, built once at startup.
pub struct AppServices {
    pub users: Arc<UserService>,
    pub cylinders: Arc<CylinderService>,
    pub orders: Arc<OrderService>,
    pub safety: Arc<SafetyService>,
    pub announcements: Arc<AnnouncementService>,
    pub ratings: Arc<RatingService>,
    pub analytics: Arc<AnalyticsService>,
}

impl AppServices {
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Option<Arc<EventSender>>,
        policy: AdvancePolicy,
    ) -> Self {
        Self {
            users: Arc::new(UserService::new(db_pool.clone())),
            cylinders: Arc::new(CylinderService::new(db_pool.clone(), event_sender.clone())),
            orders: Arc::new(OrderService::new(
                db_pool.clone(),
                event_sender.clone(),
                policy,
            )),
            safety: Arc::new(SafetyService::new(db_pool.clone(), event_sender.clone())),
            announcements: Arc::new(AnnouncementService::new(db_pool.clone())),
            ratings: Arc::new(RatingService::new(db_pool.clone(), event_sender, policy)),
            analytics: Arc::new(AnalyticsService::new(db_pool)),
        }
    }
}
