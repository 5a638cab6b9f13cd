pub mod api;
pub mod config;
pub mod docs;
pub mod identity;
pub mod model;
pub mod routes;
pub mod rules;
pub mod store;
