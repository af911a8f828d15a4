//! Admin authentication for Bazaar.
//!
//! The admin password is checked server-side against `ADMIN_PASSWORD`. A
//! successful login issues an expiring [`AdminSession`] kept in the cache;
//! protected operations present its token to [`AdminAuth::authorize`].

mod error;
mod guard;
mod secret;
mod session;

pub use error::AuthError;
pub use guard::AdminAuth;
pub use secret::{AdminSecret, ADMIN_PASSWORD_ENV};
pub use session::{AdminSession, SessionToken};
