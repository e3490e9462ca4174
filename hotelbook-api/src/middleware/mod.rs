pub mod auth;

pub use auth::{customer_auth_middleware, issue_token, AuthenticatedUser, CustomerClaims};
