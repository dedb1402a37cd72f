//! Route definitions for the car fleet.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::car;
use crate::state::AppState;

/// Car routes, registered with their full paths.
///
/// ```text
/// GET    /cars                        -> list
/// POST   /cars                        -> create
/// GET    /cars/{registration}         -> get_by_registration
/// DELETE /cars/{registration}         -> delete
/// PUT    /cars/{registration}/rentals -> rent
/// PUT    /cars/{registration}/returns -> return_car
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cars", get(car::list).post(car::create))
        .route(
            "/cars/{registration}",
            get(car::get_by_registration).delete(car::delete),
        )
        .route("/cars/{registration}/rentals", put(car::rent))
        .route("/cars/{registration}/returns", put(car::return_car))
}
