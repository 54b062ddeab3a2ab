//! Pre-orders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use imeliq_core::{Email, OrderId, OrderStatus, PickupLocation, Quantity};

/// A stored order.
///
/// `quantity` is kept as the raw column value; the table's check constraint
/// and [`Quantity`] validation on insert keep it within range.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    pub email: Email,
    pub quantity: i32,
    pub price_per_unit: Decimal,
    pub pickup_location: PickupLocation,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Amount due: `quantity × price_per_unit`.
    #[must_use]
    pub fn total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.price_per_unit
    }
}

/// A validated order, always inserted as [`OrderStatus::Pending`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub email: Email,
    pub quantity: Quantity,
    pub price_per_unit: Decimal,
    pub pickup_location: PickupLocation,
}
