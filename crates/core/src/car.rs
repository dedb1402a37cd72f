//! Car availability state machine and rental input rules.
//!
//! A car cycles between [`Availability::Available`] and
//! [`Availability::Rented`] until it is deleted. Renting is only legal from
//! `Available`, returning only from `Rented`. Returning also adds a
//! non-negative distance to the odometer.

use serde::Deserialize;

use crate::error::CoreError;

/// Entity name used in not-found errors and log fields.
pub const CAR_ENTITY: &str = "Car";

pub const NOT_AVAILABLE: &str = "Car is not available";
pub const ALREADY_AVAILABLE: &str = "Car is already available";
pub const ALREADY_EXISTS: &str = "Car already exists";

/// The two states a car can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// Parked and rentable.
    Available,
    /// Currently out with a customer.
    Rented,
}

impl Availability {
    /// Every car starts out parked.
    pub const INITIAL: Availability = Availability::Available;

    /// The persisted `available` flag for this state.
    pub fn as_flag(self) -> bool {
        matches!(self, Self::Available)
    }

    /// `Available -> Rented`.
    pub fn rent(self) -> Result<Self, CoreError> {
        match self {
            Self::Available => Ok(Self::Rented),
            Self::Rented => Err(CoreError::Conflict(NOT_AVAILABLE.to_string())),
        }
    }

    /// `Rented -> Available`.
    pub fn give_back(self) -> Result<Self, CoreError> {
        match self {
            Self::Rented => Ok(Self::Available),
            Self::Available => Err(CoreError::Conflict(ALREADY_AVAILABLE.to_string())),
        }
    }
}

/// Maps the persisted `available` flag onto a state.
impl From<bool> for Availability {
    fn from(available: bool) -> Self {
        if available {
            Self::Available
        } else {
            Self::Rented
        }
    }
}

/// Distance driven during a rental, as sent by the client.
///
/// Accepts either a JSON number (`250.7`) or a numeric string (`"250.7"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DistanceInput {
    Number(f64),
    Text(String),
}

impl DistanceInput {
    /// Resolve to a validated kilometre count.
    pub fn kilometers(&self) -> Result<f64, CoreError> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                CoreError::Validation(format!("Invalid kilometers value '{s}'"))
            })?,
        };
        validate_distance(value)
    }
}

/// Check a return distance: finite and non-negative.
pub fn validate_distance(kilometers: f64) -> Result<f64, CoreError> {
    if !kilometers.is_finite() {
        return Err(CoreError::Validation(
            "kilometers must be a finite number".to_string(),
        ));
    }
    if kilometers < 0.0 {
        return Err(CoreError::Validation(
            "kilometers must not be negative".to_string(),
        ));
    }
    Ok(kilometers)
}

/// Odometer reading after a return.
///
/// Two finite readings can still overflow to infinity, which the odometer
/// must never hold.
pub fn mileage_after_return(mileage: f64, kilometers: f64) -> Result<f64, CoreError> {
    let after = mileage + kilometers;
    if !after.is_finite() {
        return Err(CoreError::Validation(format!(
            "kilometers {kilometers} would overflow the odometer reading {mileage}"
        )));
    }
    Ok(after)
}

/// Not-found error for a registration lookup.
pub fn not_found(registration: &str) -> CoreError {
    CoreError::NotFound {
        entity: CAR_ENTITY,
        key: registration.to_string(),
    }
}

pub fn rented_message(registration: &str) -> String {
    format!("The car with registration {registration} is rented!")
}

pub fn returned_message(registration: &str) -> String {
    format!("The car with registration {registration} is returned!")
}

pub fn deleted_message(registration: &str) -> String {
    format!("The car with registration {registration} is deleted!")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
