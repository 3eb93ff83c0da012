pub mod donation;
pub mod entity;
pub mod setting;
pub mod store;
pub mod user;
