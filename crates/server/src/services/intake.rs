//! Validation of public form submissions.
//!
//! Request bodies are deserialized leniently (every field optional) and then
//! checked here, so a missing field produces a readable 400 instead of a
//! serde rejection.

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use imeliq_core::{
    Email, EmailError, Feeling, FeelingError, PickupLocation, PickupLocationError, PriceError,
    PriceTier, Quantity, QuantityError,
};

use crate::models::{NewFeedback, NewOrder, NewTester};

/// Locale stored when the registration does not name one.
pub const DEFAULT_LOCALE: &str = "et";

/// Rejected form input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntakeError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error(transparent)]
    Email(#[from] EmailError),

    #[error(transparent)]
    Feeling(#[from] FeelingError),

    #[error(transparent)]
    PickupLocation(#[from] PickupLocationError),

    #[error(transparent)]
    Quantity(#[from] QuantityError),

    #[error(transparent)]
    Price(#[from] PriceError),
}

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub family_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub marketing_consent: Option<bool>,
    pub locale: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FeedbackRequest {
    pub product_code: Option<String>,
    pub referrer_name: Option<String>,
    pub feeling: Option<String>,
    pub comments: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderRequest {
    pub email: Option<String>,
    /// Number or numeric string; validated by [`Quantity::from_json`].
    pub quantity: Option<serde_json::Value>,
    pub price_per_unit: Option<Decimal>,
    /// Whether the buyer filled in the survey (selects the price tier).
    pub gave_data: Option<bool>,
    pub pickup_location: Option<String>,
}

/// Trimmed value, or `None` when absent or blank.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn required(value: Option<String>, field: &'static str) -> Result<String, IntakeError> {
    non_blank(value).ok_or(IntakeError::MissingField(field))
}

/// Validate a tester registration.
///
/// # Errors
///
/// Returns [`IntakeError`] when `name` or `email` is missing or the email
/// is malformed.
pub fn validate_registration(req: RegisterRequest) -> Result<NewTester, IntakeError> {
    let name = required(req.name, "name")?;
    let email = Email::parse(&required(req.email, "email")?)?;

    Ok(NewTester {
        name,
        family_name: non_blank(req.family_name),
        email,
        phone: non_blank(req.phone),
        marketing_consent: req.marketing_consent.unwrap_or(false),
        locale: non_blank(req.locale).unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
    })
}

/// Validate a feedback submission.
///
/// # Errors
///
/// Returns [`IntakeError`] when a required field is blank or `feeling` is not
/// one of `nothing`, `energy`, `other`.
pub fn validate_feedback(req: FeedbackRequest) -> Result<NewFeedback, IntakeError> {
    let product_code = required(req.product_code, "product_code")?;
    let referrer_name = required(req.referrer_name, "referrer_name")?;
    let feeling: Feeling = required(req.feeling, "feeling")?.parse()?;

    Ok(NewFeedback {
        product_code,
        referrer_name,
        feeling,
        comments: non_blank(req.comments),
    })
}

/// Validate a pre-order.
///
/// A missing quantity means one unit; a quantity that is present must be a
/// whole number in `1..=100`.
///
/// # Errors
///
/// Returns [`IntakeError`] for a missing or malformed email, an unknown pickup
/// location, a bad quantity, or a price that matches no tier.
pub fn validate_order(req: OrderRequest) -> Result<NewOrder, IntakeError> {
    let email = Email::parse(&required(req.email, "email")?)?;
    let pickup_location: PickupLocation =
        required(req.pickup_location, "pickup_location")?.parse()?;

    let quantity = match req.quantity {
        None | Some(serde_json::Value::Null) => Quantity::default(),
        Some(value) => Quantity::from_json(&value)?,
    };
    let price_per_unit = PriceTier::resolve(req.gave_data, req.price_per_unit)?;

    Ok(NewOrder {
        email,
        quantity,
        price_per_unit,
        pickup_location,
    })
}
