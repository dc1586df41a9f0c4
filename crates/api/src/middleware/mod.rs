//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`rbac::RequireAuth`] -- Requires any authenticated user.
//! - [`video::VideoAccess`] -- Requires an authenticated user and the video toggle.

pub mod auth;
pub mod rbac;
pub mod video;
