pub mod certificate;
pub mod dataset;
pub mod organization;
pub mod session;
pub mod stats;
pub mod verification;
