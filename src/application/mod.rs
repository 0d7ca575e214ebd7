// Application layer - Use cases over the repository traits
pub mod catalog_service;
pub mod chart_service;
pub mod experiment_repository;
pub mod selection_service;
pub mod series_builder;
pub mod streaming_service;
pub mod view_repository;

#[cfg(test)]
pub(crate) mod fakes;
