pub mod error;
pub mod models;
pub mod store;
pub mod voter;

pub use error::{Result, StoreError};
pub use models::*;
pub use store::VoteStore;
pub use voter::{fingerprint, generate_salt, resolve_ip, Voter};

#[cfg(test)]
mod tests;
