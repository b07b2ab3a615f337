pub mod auth;
pub mod billing;
pub mod leads;
pub mod wallet;
