pub mod dashboard;
pub mod datasets;
mod multipart;
pub mod organizations;
pub mod verifications;
