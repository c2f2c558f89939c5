use sha2::{Digest, Sha256};

use super::schema::Config;

/// Digest of the effective configuration, defaults included.
///
/// Stored next to the send markers so that editing the config forces a
/// resend even when the week or day was already served.
pub fn config_hash(config: &Config) -> String {
    let canonical = serde_json::to_vec(config).unwrap_or_default();
    let digest = Sha256::digest(&canonical);
    digest.iter().map(|byte| format!("{:02x}", byte)).collect()
}
