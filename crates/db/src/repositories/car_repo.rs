//! Repository for the `cars` table.
//!
//! Every state change is a single conditional statement so concurrent
//! requests are serialized by PostgreSQL rather than by the application:
//! duplicate registrations hit `ON CONFLICT`, and rent/return only match
//! rows still in the expected availability state.

use sqlx::PgPool;

use carlot_core::car::Availability;

use crate::models::car::{Car, CreateCar};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, model, registration, mileage, available, created_at, updated_at";

/// Provides CRUD and availability transitions for cars.
pub struct CarRepo;

impl CarRepo {
    /// List every car, oldest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Car>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cars ORDER BY id");
        sqlx::query_as::<_, Car>(&query).fetch_all(pool).await
    }

    /// Find a car by its registration.
    pub async fn find_by_registration(
        pool: &PgPool,
        registration: &str,
    ) -> Result<Option<Car>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cars WHERE registration = $1");
        sqlx::query_as::<_, Car>(&query)
            .bind(registration)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new, available car.
    ///
    /// Returns `None` if the registration is already taken.
    pub async fn create(pool: &PgPool, input: &CreateCar) -> Result<Option<Car>, sqlx::Error> {
        let query = format!(
            "INSERT INTO cars (model, registration, mileage, available) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT ON CONSTRAINT uq_cars_registration DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Car>(&query)
            .bind(&input.model)
            .bind(&input.registration)
            .bind(input.mileage)
            .bind(Availability::INITIAL.as_flag())
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a car, returning the removed row.
    pub async fn delete_by_registration(
        pool: &PgPool,
        registration: &str,
    ) -> Result<Option<Car>, sqlx::Error> {
        let query = format!("DELETE FROM cars WHERE registration = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Car>(&query)
            .bind(registration)
            .fetch_optional(pool)
            .await
    }

    /// Flip an available car to rented.
    ///
    /// Returns `None` if no *available* car has this registration.
    pub async fn mark_rented(pool: &PgPool, registration: &str) -> Result<Option<Car>, sqlx::Error> {
        let query = format!(
            "UPDATE cars SET available = false \
             WHERE registration = $1 AND available = true \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Car>(&query)
            .bind(registration)
            .fetch_optional(pool)
            .await
    }

    /// Flip a rented car back to available and add the driven distance.
    ///
    /// Returns `None` if no *rented* car has this registration.
    pub async fn mark_returned(
        pool: &PgPool,
        registration: &str,
        kilometers: f64,
    ) -> Result<Option<Car>, sqlx::Error> {
        let query = format!(
            "UPDATE cars SET available = true, mileage = mileage + $2 \
             WHERE registration = $1 AND available = false \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Car>(&query)
            .bind(registration)
            .bind(kilometers)
            .fetch_optional(pool)
            .await
    }
}
