pub mod catalog;
pub mod config;
pub mod error;
pub mod ids;
pub mod services;
pub mod store;
pub mod validation;
