// Infrastructure layer - External dependencies and adapters
pub mod chunked_stream;
pub mod config;
pub mod file_view_repository;
pub mod http_response;
pub mod postgrest_repository;
