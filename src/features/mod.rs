pub mod auth;
pub mod categories;
pub mod comments;
pub mod complaints;
pub mod supports;
