// Library exports for DataFlow
// This allows integration tests and the binary to share modules

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod repositories;
pub mod routes;
pub mod schemas;
pub mod services;
pub mod state;
