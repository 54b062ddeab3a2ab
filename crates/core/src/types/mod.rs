//! Core types for Imeliq.
//!
//! This module provides type-safe wrappers for the domain concepts shared by
//! the intake endpoints, the admin API and the CLI.

pub mod category;
pub mod email;
pub mod feeling;
pub mod id;
pub mod pickup;
pub mod price;
pub mod quantity;
pub mod status;

pub use category::{CategoryError, DataCategory, RecordKind};
pub use email::{Email, EmailError};
pub use feeling::{Feeling, FeelingError};
pub use id::*;
pub use pickup::{PickupLocation, PickupLocationError};
pub use price::{PriceError, PriceTier};
pub use quantity::{Quantity, QuantityError};
pub use status::{OrderStatus, StatusError, TransitionError};
