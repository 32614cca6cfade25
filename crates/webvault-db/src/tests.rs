//! Database integration test modules.

mod audit_log_tests;
mod bulk_review_tests;
mod submission_tests;
mod tag_listing_tests;
mod website_listing_tests;
