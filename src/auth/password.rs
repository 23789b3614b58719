//! Stored format: `sha256$<salt>$<hex digest of salt$password>`

use super::{new_salt, sha256_hex};

const ALGORITHM: &str = "sha256";

pub fn hash_password(password: &str) -> String {
    let salt = new_salt();
    let digest = sha256_hex(&salt, password);
    format!("{}${}${}", ALGORITHM, salt, digest)
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(ALGORITHM), Some(salt), Some(digest)) => constant_time_eq(sha256_hex(salt, password).as_bytes(), digest.as_bytes()),
        _ => false,
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_its_own_hashes() {
        let stored = hash_password("whiskers99");
        assert!(stored.starts_with("sha256$"));
        assert!(verify_password("whiskers99", &stored));
        assert!(!verify_password("whiskers98", &stored));
    }

    #[test]
    fn salts_every_hash() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn rejects_unknown_formats() {
        assert!(!verify_password("x", "md5$abc$def"));
        assert!(!verify_password("x", "garbage"));
    }
}
