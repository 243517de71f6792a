//! Anti-replay tokens for admin actions
//!
//! A nonce is a keyed BLAKE3 hash of the action name and a time tick. The
//! tick advances every half lifetime and the previous tick is still
//! accepted, so a token stays valid for between one half and one full
//! lifetime.

use time::OffsetDateTime;

/// Action name bound into bulk-cleanup nonces
pub const BULK_ACTION: &str = "ip_scrub_bulk";

/// Action name bound into settings-form nonces
pub const SETTINGS_ACTION: &str = "scrub_comment_author_ip";

const KEY_CONTEXT: &str = "scrub admin nonce v1";

pub struct NonceIssuer {
    key: [u8; 32],
    lifetime_secs: u64,
}

impl NonceIssuer {
    /// Without a configured secret a random per-process key is used, so
    /// tokens do not survive a restart.
    pub fn new(secret: Option<&str>, lifetime_secs: u64) -> Self {
        let key = match secret {
            Some(secret) => blake3::derive_key(KEY_CONTEXT, secret.as_bytes()),
            None => blake3::derive_key(KEY_CONTEXT, uuid::Uuid::new_v4().as_bytes()),
        };
        Self { key, lifetime_secs }
    }

    pub fn create(&self, action: &str) -> String {
        self.create_at(action, now())
    }

    pub fn verify(&self, action: &str, nonce: &str) -> bool {
        self.verify_at(action, nonce, now())
    }

    pub fn create_at(&self, action: &str, unix_secs: i64) -> String {
        self.digest(action, self.tick(unix_secs)).to_hex().to_string()
    }

    pub fn verify_at(&self, action: &str, nonce: &str, unix_secs: i64) -> bool {
        let Ok(given) = blake3::Hash::from_hex(nonce) else {
            return false;
        };
        let tick = self.tick(unix_secs);
        // blake3::Hash equality is constant-time
        [tick, tick - 1]
            .into_iter()
            .any(|t| self.digest(action, t) == given)
    }

    fn tick(&self, unix_secs: i64) -> i64 {
        let half = (self.lifetime_secs / 2).max(1) as i64;
        unix_secs.div_euclid(half)
    }

    fn digest(&self, action: &str, tick: i64) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new_keyed(&self.key);
        hasher.update(action.as_bytes());
        hasher.update(b"|");
        hasher.update(&tick.to_le_bytes());
        hasher.finalize()
    }
}

fn now() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}
