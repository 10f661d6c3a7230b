pub mod protected; // Bearer token required
pub mod public; // No authentication
