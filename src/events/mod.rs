//! Domain events emitted after state changes commit.
//!
//! Events are fire-and-forget: services publish them onto a bounded channel
//! and a background task drains the channel. A full or closed channel never
//! fails the originating request; the send error is logged and the request
//! proceeds.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;

use crate::entities::{CylinderSpecs, CylinderStatus, HazardLevel, OrderStatus};

/// Everything downstream consumers can observe about this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    OrderCreated {
        order_id: i64,
        customer_id: i64,
        specs: CylinderSpecs,
        quantity: i32,
    },
    OrderAssigned {
        order_id: i64,
        courier_id: i64,
    },
    OrderStatusChanged {
        order_id: i64,
        old_status: OrderStatus,
        new_status: OrderStatus,
    },
    OrderCompleted {
        order_id: i64,
        cylinders_allocated: u64,
    },
    CylinderCreated {
        cylinder_id: i64,
        specs: CylinderSpecs,
    },
    CylinderStatusChanged {
        cylinder_id: i64,
        old_status: CylinderStatus,
        new_status: CylinderStatus,
    },
    CylinderDeleted {
        cylinder_id: i64,
    },
    SafetyRecordCreated {
        record_id: i64,
        order_id: i64,
        hazard_level: HazardLevel,
    },
    RatingCreated {
        rating_id: i64,
        order_id: i64,
        score: i16,
    },
}

/// Cloneable handle for publishing events from services.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Drains the event channel, logging each event. Runs until every
/// [`EventSender`] clone is dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Event processor started");
    while let Some(event) = rx.recv().await {
        info!(?event, "Processing event");
    }
    info!("Event processor shutting down");
}
