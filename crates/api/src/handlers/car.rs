//! Handlers for the `/cars` resource.
//!
//! Mutating handlers check in a fixed order: body syntax first, then that the
//! car exists, then field values, then the availability transition, and only
//! then the atomic store write. A write that matches nothing means another request
//! changed the car in between and is reported as a conflict.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use carlot_core::car::{self, Availability};
use carlot_core::error::CoreError;
use carlot_db::models::car::{Car, CreateCar, ReturnCar};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::CarMessageResponse;
use crate::state::AppState;

/// Look up a car by registration, mapping absence to 404.
async fn ensure_car_exists(state: &AppState, registration: &str) -> AppResult<Car> {
    state
        .store
        .find_by_registration(registration)
        .await?
        .ok_or_else(|| {
            tracing::debug!(registration, "Car not found");
            AppError::Core(car::not_found(registration))
        })
}

fn conflict(message: &str) -> AppError {
    AppError::Core(CoreError::Conflict(message.to_string()))
}

/// GET /cars
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Car>>> {
    let cars = state.store.list().await?;
    Ok(Json(cars))
}

/// POST /cars
///
/// New cars are always available, whatever the payload says. A payload
/// without `mileage` adds a brand new car at 0 km.
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateCar>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Car>)> {
    let Json(input) = payload?;
    let input = input.normalized();
    input.validate()?;

    if state
        .store
        .find_by_registration(&input.registration)
        .await?
        .is_some()
    {
        tracing::debug!(registration = %input.registration, "Duplicate registration rejected");
        return Err(conflict(car::ALREADY_EXISTS));
    }

    let created = state
        .store
        .insert(&input)
        .await?
        .ok_or_else(|| conflict(car::ALREADY_EXISTS))?;

    tracing::info!(
        car_id = created.id,
        registration = %created.registration,
        mileage = created.mileage,
        "Car added to fleet",
    );

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /cars/{registration}
pub async fn get_by_registration(
    State(state): State<AppState>,
    Path(registration): Path<String>,
) -> AppResult<Json<Car>> {
    let car = ensure_car_exists(&state, &registration).await?;
    Ok(Json(car))
}

/// DELETE /cars/{registration}
///
/// Hard delete. Answers 200 with the removed car.
pub async fn delete(
    State(state): State<AppState>,
    Path(registration): Path<String>,
) -> AppResult<Json<CarMessageResponse>> {
    ensure_car_exists(&state, &registration).await?;

    let removed = state
        .store
        .delete(&registration)
        .await?
        .ok_or_else(|| AppError::Core(car::not_found(&registration)))?;

    tracing::info!(car_id = removed.id, registration = %registration, "Car deleted");

    Ok(Json(CarMessageResponse {
        message: car::deleted_message(&registration),
        car: removed,
    }))
}

/// PUT /cars/{registration}/rentals
pub async fn rent(
    State(state): State<AppState>,
    Path(registration): Path<String>,
) -> AppResult<Json<CarMessageResponse>> {
    let current = ensure_car_exists(&state, &registration).await?;
    Availability::from(current.available).rent()?;

    let rented = state
        .store
        .mark_rented(&registration)
        .await?
        .ok_or_else(|| {
            tracing::warn!(registration = %registration, "Rent lost a race with another request");
            conflict(car::NOT_AVAILABLE)
        })?;

    tracing::info!(car_id = rented.id, registration = %registration, "Car rented");

    Ok(Json(CarMessageResponse {
        message: car::rented_message(&registration),
        car: rented,
    }))
}

/// PUT /cars/{registration}/returns
///
/// Body: `{ "kilometers": <number> }`. An unknown registration is a 404
/// before the distance is looked at; a bad distance is a 400 whatever the
/// car's state.
pub async fn return_car(
    State(state): State<AppState>,
    Path(registration): Path<String>,
    payload: Result<Json<ReturnCar>, JsonRejection>,
) -> AppResult<Json<CarMessageResponse>> {
    let Json(input) = payload?;

    let current = ensure_car_exists(&state, &registration).await?;
    let kilometers = input.kilometers.kilometers()?;
    Availability::from(current.available).give_back()?;
    car::mileage_after_return(current.mileage, kilometers)?;

    let returned = state
        .store
        .mark_returned(&registration, kilometers)
        .await?
        .ok_or_else(|| {
            tracing::warn!(registration = %registration, "Return lost a race with another request");
            conflict(car::ALREADY_AVAILABLE)
        })?;

    tracing::info!(
        car_id = returned.id,
        registration = %registration,
        kilometers,
        mileage = returned.mileage,
        "Car returned",
    );

    Ok(Json(CarMessageResponse {
        message: car::returned_message(&registration),
        car: returned,
    }))
}
