pub mod app;
pub mod error;
mod extract;
pub mod pagination;
mod routes;
