pub mod error;
pub mod factory;
pub mod password;
pub mod repos;
pub mod service;
