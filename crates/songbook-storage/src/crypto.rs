//! Password hashing and session token generation.
//!
//! Passwords are stored as PBKDF2-HMAC-SHA256 with a random 16-byte salt,
//! encoded as `pbkdf2_sha256$<iterations>$<salt_b64>$<hash_b64>`.

use std::num::NonZeroU32;

use anyhow::{Context, Result};
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};

/// Scheme tag at the start of every encoded hash.
const SCHEME: &str = "pbkdf2_sha256";

/// Salt size in bytes.
const SALT_SIZE: usize = 16;

/// Derived key size in bytes.
const HASH_SIZE: usize = 32;

/// Default PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Size of a session token before encoding (32 bytes = 256 bits).
pub const TOKEN_SIZE: usize = 32;

static ALGORITHM: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;

/// Salted password hasher.
pub struct PasswordHasher {
    iterations: NonZeroU32,
    rng: SystemRandom,
}

impl PasswordHasher {
    /// Hasher with the default iteration count.
    pub fn new() -> Self {
        Self::with_iterations(DEFAULT_ITERATIONS)
    }

    /// Hasher with a custom iteration count (clamped to at least 1).
    ///
    /// Low counts are only meant for tests.
    pub fn with_iterations(iterations: u32) -> Self {
        Self {
            iterations: NonZeroU32::new(iterations).unwrap_or(NonZeroU32::MIN),
            rng: SystemRandom::new(),
        }
    }

    /// Hash a password with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String> {
        let mut salt = [0u8; SALT_SIZE];
        self.rng
            .fill(&mut salt)
            .map_err(|_| anyhow::anyhow!("Failed to generate salt"))?;

        let mut hash = [0u8; HASH_SIZE];
        pbkdf2::derive(
            ALGORITHM,
            self.iterations,
            &salt,
            password.as_bytes(),
            &mut hash,
        );

        Ok(format!(
            "{}${}${}${}",
            SCHEME,
            self.iterations,
            STANDARD_NO_PAD.encode(salt),
            STANDARD_NO_PAD.encode(hash)
        ))
    }

    /// Check a password against an encoded hash.
    ///
    /// Returns `Ok(false)` on mismatch and an error only for malformed input.
    /// The comparison runs in constant time.
    pub fn verify(&self, password: &str, encoded: &str) -> Result<bool> {
        let mut parts = encoded.split('$');
        let (scheme, iterations, salt, hash) =
            match (parts.next(), parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(s), Some(i), Some(salt), Some(hash), None) => (s, i, salt, hash),
                _ => anyhow::bail!("Malformed password hash"),
            };

        if scheme != SCHEME {
            anyhow::bail!("Unsupported password hash scheme: {}", scheme);
        }

        let iterations: u32 = iterations
            .parse()
            .context("Invalid iteration count in password hash")?;
        let iterations =
            NonZeroU32::new(iterations).context("Zero iteration count in password hash")?;
        let salt = STANDARD_NO_PAD
            .decode(salt)
            .context("Invalid salt encoding")?;
        let hash = STANDARD_NO_PAD
            .decode(hash)
            .context("Invalid hash encoding")?;

        Ok(pbkdf2::verify(ALGORITHM, iterations, &salt, password.as_bytes(), &hash).is_ok())
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a URL-safe random token (session identifiers).
pub fn generate_token() -> Result<String> {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; TOKEN_SIZE];
    rng.fill(&mut bytes)
        .map_err(|_| anyhow::anyhow!("Failed to generate token"))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}
