//! Network utilities for HTTP operations and retries.
//!
//! This module provides:
//! - A JSON-over-HTTP client that classifies upstream failures
//! - Retry logic with exponential backoff and jitter

mod client;
mod retry;

pub use client::{extract_domain, HttpClient, NO_QUERY};
pub use retry::{retry_async, RetryPolicy};
