mod jwt;

pub mod model;

pub use jwt::JwtValidator;
