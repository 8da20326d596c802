// ABOUTME: HTTP middleware for cross-cutting request concerns
// ABOUTME: Provides CORS configuration for the HTTP router

pub mod cors;

// CORS configuration
pub use cors::setup_cors;
