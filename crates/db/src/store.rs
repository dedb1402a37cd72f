//! The [`CarStore`] seam between HTTP handlers and persistence.
//!
//! Handlers hold an `Arc<dyn CarStore>` so production runs against
//! PostgreSQL ([`PgCarStore`]) and tests against
//! [`MemoryCarStore`](crate::memory::MemoryCarStore).
//!
//! Every write is atomic with respect to its precondition: `insert` fails
//! softly on a taken registration, `mark_rented`/`mark_returned` only match a
//! car in the expected state. A `None` from a write means the precondition
//! did not hold at the instant of the write.

use async_trait::async_trait;

use crate::models::car::{Car, CreateCar};
use crate::repositories::CarRepo;
use crate::DbPool;

#[async_trait]
pub trait CarStore: Send + Sync {
    /// Verify the backing store is reachable.
    async fn ping(&self) -> Result<(), sqlx::Error>;

    /// All cars, ordered by id.
    async fn list(&self) -> Result<Vec<Car>, sqlx::Error>;

    /// Look a car up by registration. No side effects.
    async fn find_by_registration(&self, registration: &str) -> Result<Option<Car>, sqlx::Error>;

    /// Add a car with `available = true`. `None` if the registration exists.
    async fn insert(&self, input: &CreateCar) -> Result<Option<Car>, sqlx::Error>;

    /// Remove a car. `None` if there was nothing to remove.
    async fn delete(&self, registration: &str) -> Result<Option<Car>, sqlx::Error>;

    /// `available: true -> false`. `None` if no available car matched.
    async fn mark_rented(&self, registration: &str) -> Result<Option<Car>, sqlx::Error>;

    /// `available: false -> true`, `mileage += kilometers`. `None` if no
    /// rented car matched.
    async fn mark_returned(
        &self,
        registration: &str,
        kilometers: f64,
    ) -> Result<Option<Car>, sqlx::Error>;
}

/// PostgreSQL-backed store delegating to [`CarRepo`].
#[derive(Clone)]
pub struct PgCarStore {
    pool: DbPool,
}

impl PgCarStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CarStore for PgCarStore {
    async fn ping(&self) -> Result<(), sqlx::Error> {
        crate::health_check(&self.pool).await
    }

    async fn list(&self) -> Result<Vec<Car>, sqlx::Error> {
        CarRepo::list(&self.pool).await
    }

    async fn find_by_registration(&self, registration: &str) -> Result<Option<Car>, sqlx::Error> {
        CarRepo::find_by_registration(&self.pool, registration).await
    }

    async fn insert(&self, input: &CreateCar) -> Result<Option<Car>, sqlx::Error> {
        CarRepo::create(&self.pool, input).await
    }

    async fn delete(&self, registration: &str) -> Result<Option<Car>, sqlx::Error> {
        CarRepo::delete_by_registration(&self.pool, registration).await
    }

    async fn mark_rented(&self, registration: &str) -> Result<Option<Car>, sqlx::Error> {
        CarRepo::mark_rented(&self.pool, registration).await
    }

    async fn mark_returned(
        &self,
        registration: &str,
        kilometers: f64,
    ) -> Result<Option<Car>, sqlx::Error> {
        CarRepo::mark_returned(&self.pool, registration, kilometers).await
    }
}
