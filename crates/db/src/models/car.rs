//! Car entity model and DTOs.

use carlot_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `cars` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Car {
    pub id: DbId,
    pub model: String,
    pub registration: String,
    pub mileage: f64,
    pub available: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adding a car to the fleet.
///
/// Missing text fields deserialize as empty and fail validation; a missing
/// mileage means a brand new car. Any `available` field sent by the client
/// is ignored, new cars are always available.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCar {
    #[serde(default)]
    #[validate(length(min = 1, max = 128, message = "model must be 1-128 characters"))]
    pub model: String,
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 64,
        message = "registration must be 1-64 characters"
    ))]
    pub registration: String,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "mileage must not be negative"))]
    pub mileage: f64,
}

impl CreateCar {
    /// Strip surrounding whitespace so blank values fail the length check.
    pub fn normalized(mut self) -> Self {
        self.model = self.model.trim().to_string();
        self.registration = self.registration.trim().to_string();
        self
    }
}

/// Body of `PUT /cars/{registration}/returns`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReturnCar {
    pub kilometers: carlot_core::car::DistanceInput,
}
