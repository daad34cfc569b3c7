//! Employee records with salaries encrypted at rest.
//!
//! # Module invariants
//!
//! - The store never sees a plaintext salary; the service encrypts before every
//!   write and decrypts after every read.
//! - Validation runs before any cipher or store call, so a client error never
//!   consumes a nonce or touches stored data.

pub mod service;
pub mod store;

pub use service::EmployeeService;
pub use store::EmployeeStore;
