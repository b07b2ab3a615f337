pub mod billing;
pub mod leads;
pub mod session;
pub mod wallet;
