//! Service façades used by the route handlers.
//!
//! Services stay thin: they call repositories, enforce boundary
//! validation, and leave response shaping to the handlers.

mod favicon_service;
mod website_service;

pub use favicon_service::{upstream_sources, FaviconService, FetchedIcon};
pub use website_service::WebsiteService;
