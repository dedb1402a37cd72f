//! Response envelopes shared by the car handlers.

use carlot_db::models::car::Car;
use serde::Serialize;

/// `{ "message": ..., "car": ... }` body returned by rent, return and delete.
#[derive(Debug, Serialize)]
pub struct CarMessageResponse {
    pub message: String,
    pub car: Car,
}
