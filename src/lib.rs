pub mod error;
pub mod models;
pub mod modules;
pub mod proxy; // Proxy service module
