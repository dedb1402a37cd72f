//! Pure domain logic for the car rental fleet: shared types, the error
//! taxonomy and the availability state machine. Nothing in this crate
//! touches the network or the database.

pub mod car;
pub mod error;
pub mod types;
