// Application layer - Use cases, session state and repository traits
pub mod aggregation;
pub mod cat_repository;
pub mod cat_service;
pub mod clock;
pub mod interval_cache;
pub mod session;
