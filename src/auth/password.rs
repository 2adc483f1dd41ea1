use bcrypt::BcryptError;

/// Hash a plaintext password with bcrypt at the given cost.
pub fn hash(password: &str, cost: u32) -> Result<String, BcryptError> {
    bcrypt::hash(password, cost)
}

/// Check a plaintext password against a stored hash.
/// A malformed stored hash counts as a mismatch.
pub fn verify(password: &str, hashed: &str) -> bool {
    bcrypt::verify(password, hashed).unwrap_or(false)
}

/// Spend the same bcrypt work as `verify` when there is no stored hash, so
/// unknown accounts cannot be told apart by response time. Always a mismatch.
pub fn verify_missing(password: &str, cost: u32) -> bool {
    let _ = bcrypt::hash(password, cost);
    false
}
