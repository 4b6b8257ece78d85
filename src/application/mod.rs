// Application layer - Use cases over the dashboard API
pub mod catalog_service;
pub mod dashboard_api;
pub mod dashboard_service;

#[cfg(test)]
pub(crate) mod testing;
