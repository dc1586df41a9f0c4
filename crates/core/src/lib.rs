//! Domain logic for point-of-sale webcam monitoring.
//!
//! Everything here is free of database and network dependencies so it can
//! be shared by the repository layer, the HTTP server and any tooling.

pub mod error;
pub mod export;
pub mod filter;
pub mod media;
pub mod monitor;
pub mod pagination;
pub mod roles;
pub mod signing;
pub mod status;
pub mod types;
