//! Route handlers organized by resource

pub mod businesses;
pub mod health;
pub mod resource;
pub mod reviews;
