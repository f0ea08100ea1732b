pub mod app;
pub mod auth;
pub mod config;
mod db;
pub mod errors;
pub mod external;
pub mod logging;
pub mod models;
mod routes;
pub mod services;
pub mod state;
pub mod store;
