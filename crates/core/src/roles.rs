//! Role names carried in access tokens and stored in `users.role`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";
