//! Authentication: password hashing, session tokens, and the gate that turns a
//! `token` cookie into an [`AuthenticatedUser`].

pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{is_strong_password, PasswordHasher};
pub use token::{expired_session_cookie, session_cookie, Claims, TokenKeys, TOKEN_COOKIE};
