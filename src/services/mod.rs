pub mod auth;
pub use auth::{AuthService, Claims, TokenError};

pub mod notify;
pub use notify::Notifier;
