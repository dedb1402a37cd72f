//! In-process [`CarStore`] used by tests and local experiments.
//!
//! A single `RwLock` guards the whole fleet, so every operation is atomic in
//! the same way the conditional SQL statements are.

use async_trait::async_trait;
use carlot_core::car::{mileage_after_return, Availability};
use carlot_core::types::DbId;
use tokio::sync::RwLock;

use crate::models::car::{Car, CreateCar};
use crate::store::CarStore;

#[derive(Default)]
struct Fleet {
    next_id: DbId,
    cars: Vec<Car>,
}

impl Fleet {
    fn position(&self, registration: &str) -> Option<usize> {
        self.cars.iter().position(|c| c.registration == registration)
    }

    fn push(&mut self, model: &str, registration: &str, mileage: f64, available: bool) -> Car {
        self.next_id += 1;
        let now = chrono::Utc::now();
        let car = Car {
            id: self.next_id,
            model: model.to_string(),
            registration: registration.to_string(),
            mileage,
            available,
            created_at: now,
            updated_at: now,
        };
        self.cars.push(car.clone());
        car
    }
}

/// Memory-backed fleet with the same semantics as
/// [`PgCarStore`](crate::store::PgCarStore).
#[derive(Default)]
pub struct MemoryCarStore {
    fleet: RwLock<Fleet>,
}

impl MemoryCarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder used to pre-populate a fleet, including rented cars.
    ///
    /// Seeding an existing registration is ignored, as the unique
    /// constraint would.
    pub fn with_car(mut self, model: &str, registration: &str, mileage: f64, available: bool) -> Self {
        let fleet = self.fleet.get_mut();
        if fleet.position(registration).is_none() {
            fleet.push(model, registration, mileage, available);
        }
        self
    }
}

#[async_trait]
impl CarStore for MemoryCarStore {
    async fn ping(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Car>, sqlx::Error> {
        Ok(self.fleet.read().await.cars.clone())
    }

    async fn find_by_registration(&self, registration: &str) -> Result<Option<Car>, sqlx::Error> {
        let fleet = self.fleet.read().await;
        Ok(fleet.position(registration).map(|i| fleet.cars[i].clone()))
    }

    async fn insert(&self, input: &CreateCar) -> Result<Option<Car>, sqlx::Error> {
        let mut fleet = self.fleet.write().await;
        if fleet.position(&input.registration).is_some() {
            return Ok(None);
        }
        Ok(Some(fleet.push(
            &input.model,
            &input.registration,
            input.mileage,
            Availability::INITIAL.as_flag(),
        )))
    }

    async fn delete(&self, registration: &str) -> Result<Option<Car>, sqlx::Error> {
        let mut fleet = self.fleet.write().await;
        Ok(fleet.position(registration).map(|i| fleet.cars.remove(i)))
    }

    async fn mark_rented(&self, registration: &str) -> Result<Option<Car>, sqlx::Error> {
        let mut fleet = self.fleet.write().await;
        let Some(i) = fleet.position(registration) else {
            return Ok(None);
        };
        let car = &mut fleet.cars[i];
        if !car.available {
            return Ok(None);
        }
        car.available = false;
        car.updated_at = chrono::Utc::now();
        Ok(Some(car.clone()))
    }

    async fn mark_returned(
        &self,
        registration: &str,
        kilometers: f64,
    ) -> Result<Option<Car>, sqlx::Error> {
        let mut fleet = self.fleet.write().await;
        let Some(i) = fleet.position(registration) else {
            return Ok(None);
        };
        let car = &mut fleet.cars[i];
        if car.available {
            return Ok(None);
        }
        // A reading that would overflow leaves the car untouched, as the
        // finite-mileage check constraint does.
        let Ok(mileage) = mileage_after_return(car.mileage, kilometers) else {
            return Ok(None);
        };
        car.available = true;
        car.mileage = mileage;
        car.updated_at = chrono::Utc::now();
        Ok(Some(car.clone()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assert_matches::assert_matches;

    use super::*;

    fn new_car(registration: &str, mileage: f64) -> CreateCar {
        CreateCar {
            model: "Model".to_string(),
            registration: registration.to_string(),
            mileage,
        }
    }

    #[tokio::test]
    async fn insert_forces_available_and_assigns_ids() {
        let store = MemoryCarStore::new();
        let first = store.insert(&new_car("A", 10.0)).await.unwrap().unwrap();
        let second = store.insert(&new_car("B", 0.0)).await.unwrap().unwrap();

        assert!(first.available);
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected_and_original_kept() {
        let store = MemoryCarStore::new();
        store.insert(&new_car("A", 10.0)).await.unwrap();

        assert_matches!(store.insert(&new_car("A", 99.0)).await, Ok(None));

        let kept = store.find_by_registration("A").await.unwrap().unwrap();
        assert_eq!(kept.mileage, 10.0);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rent_only_matches_available_cars() {
        let store = MemoryCarStore::new().with_car("M", "A", 0.0, true);

        let rented = store.mark_rented("A").await.unwrap().unwrap();
        assert!(!rented.available);
        assert_matches!(store.mark_rented("A").await, Ok(None));
        assert_matches!(store.mark_rented("missing").await, Ok(None));
    }

    #[tokio::test]
    async fn return_only_matches_rented_cars() {
        let store = MemoryCarStore::new().with_car("M", "A", 500.0, false);

        let returned = store.mark_returned("A", 250.5).await.unwrap().unwrap();
        assert!(returned.available);
        assert_eq!(returned.mileage, 750.5);
        assert_matches!(store.mark_returned("A", 1.0).await, Ok(None));

        let stored = store.find_by_registration("A").await.unwrap().unwrap();
        assert_eq!(stored.mileage, 750.5);
    }

    #[tokio::test]
    async fn overflowing_return_leaves_car_rented() {
        let store = MemoryCarStore::new().with_car("M", "Big", 1.7e308, false);

        assert_matches!(store.mark_returned("Big", 1.7e308).await, Ok(None));

        let stored = store.find_by_registration("Big").await.unwrap().unwrap();
        assert!(!stored.available);
        assert_eq!(stored.mileage, 1.7e308);
    }

    #[tokio::test]
    async fn delete_removes_the_car() {
        let store = MemoryCarStore::new().with_car("M", "A", 0.0, true);

        assert_matches!(store.delete("A").await, Ok(Some(car)) if car.registration == "A");
        assert_matches!(store.delete("A").await, Ok(None));
        assert_matches!(store.find_by_registration("A").await, Ok(None));
    }

    #[tokio::test]
    async fn concurrent_rents_have_a_single_winner() {
        let store = Arc::new(MemoryCarStore::new().with_car("M", "A", 0.0, true));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.mark_rented("A").await.unwrap().is_some() })
            })
            .collect();

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[test]
    fn seeding_ignores_duplicate_registrations() {
        let store = MemoryCarStore::new()
            .with_car("M1", "A", 1.0, true)
            .with_car("M2", "A", 2.0, false);
        let fleet = store.fleet.into_inner();
        assert_eq!(fleet.cars.len(), 1);
        assert_eq!(fleet.cars[0].model, "M1");
    }
}
