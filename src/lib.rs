//! Vendor API Library
//!
//! A single-endpoint service that accepts vendor documents as JSON and
//! writes them to a MongoDB collection.
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `db`: MongoDB connection bootstrap and the `VendorStore` seam.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `models`: Vendor document and response models.
//! - `routes`: Router and middleware assembly.

pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
