pub mod access;
pub mod auth;
pub mod earnings;
pub mod members;
pub mod notifications;
pub mod shared;
