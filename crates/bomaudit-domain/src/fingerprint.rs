use bomaudit_types::Finding;
use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a finding.
///
/// Identity fields:
/// - category code
/// - participants (`usage`, dependency key, or `from -> to`)
/// - consumer key
pub fn fingerprint_for_finding(finding: &Finding) -> String {
    let code = finding.category().code();
    let participants = finding.participants();
    let consumer = finding.consumer().to_string();
    fingerprint_parts(&[code, &participants, &consumer])
}

pub fn fingerprint_parts(parts: &[&str]) -> String {
    let canonical = parts.join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
