// Protected handlers: every route here sits behind jwt_auth_middleware and
// receives the caller as Extension<AuthUser>.

pub mod comments;
pub mod photos;
pub mod socials;
pub mod users;
pub mod utils;
