// Public handlers: token acquisition, registration and liveness. No
// authentication is required to reach these routes.

pub mod health;
pub mod users;
