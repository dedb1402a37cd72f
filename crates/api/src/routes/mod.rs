pub mod car;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the application route tree.
///
/// ```text
/// /cars                                   list, add
/// /cars/{registration}                    get, delete
/// /cars/{registration}/rentals            rent (PUT)
/// /cars/{registration}/returns            return (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(car::router())
}
