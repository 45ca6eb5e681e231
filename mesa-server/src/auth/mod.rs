//! Authentication
//!
//! Bearer tokens are issued by an external provider; this service only
//! verifies them:
//! - [`JwtService`] - HS256 token validation (and issuing, for tooling/tests)
//! - [`CurrentUser`] - principal injected into request extensions
//! - [`authenticate`] / [`require_staff`] / [`require_admin`] - middleware

pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService, Role};
pub use middleware::{CurrentUserExt, authenticate, require_admin, require_staff};
