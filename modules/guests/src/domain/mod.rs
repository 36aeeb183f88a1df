pub mod allocator;
pub mod error;
pub mod repo;
pub mod service;
