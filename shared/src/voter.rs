use std::net::IpAddr;
use ring::rand::{SecureRandom, SystemRandom};
use sha2::{Digest, Sha256};
use crate::error::{Result, StoreError};

pub const SALT_LENGTH: usize = 20;
pub const ANONYMOUS_IP: &str = "undefined";

const SALT_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
// Largest multiple of the alphabet size that fits in a byte; anything above is resampled.
const SALT_BYTE_LIMIT: u8 = (256 / SALT_ALPHABET.len() * SALT_ALPHABET.len()) as u8;

/// Identity of whoever sent the request, as far as vote dedup is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voter {
    pub ip: String,
}

pub fn generate_salt() -> Result<String> {
    let rng = SystemRandom::new();
    let mut salt = String::with_capacity(SALT_LENGTH);
    let mut bytes = [0u8; 32];

    while salt.len() < SALT_LENGTH {
        rng.fill(&mut bytes).map_err(|_| StoreError::Random)?;
        for &byte in bytes.iter().filter(|&&b| b < SALT_BYTE_LIMIT) {
            if salt.len() == SALT_LENGTH {
                break;
            }
            salt.push(SALT_ALPHABET[byte as usize % SALT_ALPHABET.len()] as char);
        }
    }

    Ok(salt)
}

pub fn fingerprint(salt: &str, ip: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(ip.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Repeated forwarded-for headers are read as one comma-separated list.
pub fn join_forwarded<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let values: Vec<&str> = values.into_iter().collect();
    if values.is_empty() {
        None
    } else {
        Some(values.join(", "))
    }
}

/// Forwarded header first, then the peer address, then the shared anonymous bucket.
pub fn resolve_ip(forwarded_for: Option<&str>, remote: Option<IpAddr>) -> String {
    match (forwarded_for.filter(|value| !value.is_empty()), remote) {
        (Some(forwarded), _) => forwarded.to_string(),
        (None, Some(addr)) => addr.to_string(),
        (None, None) => ANONYMOUS_IP.to_string(),
    }
}

#[cfg(feature = "backend")]
mod backend_impl {
    use super::*;
    use rocket::request::{FromRequest, Outcome};
    use rocket::Request;

    #[rocket::async_trait]
    impl<'r> FromRequest<'r> for Voter {
        type Error = ();

        async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
            let forwarded = join_forwarded(req.headers().get("X-Forwarded-For"));
            let remote = req.remote().map(|addr| addr.ip());

            Outcome::Success(Voter {
                ip: resolve_ip(forwarded.as_deref(), remote),
            })
        }
    }
}
