//! Types shared between the verification server and its clients.
//!
//! - `model`: datasets, certificate records, verification history, sessions.
//! - `filter`: search and status/date filtering over listed records.
//! - `jobs`: status of background verification jobs.
//! - `requests`: request payloads and query strings accepted by the API.

pub mod filter;
pub mod jobs;
pub mod model;
pub mod requests;
