use chrono::{Duration, Utc};
use rand::Rng;
use rusqlite::{params, Connection, OptionalExtension};

// Ten years; keeps the expiry arithmetic well inside chrono's range.
const MAX_SESSION_HOURS: u64 = 24 * 365 * 10;

/// Create a new session for a user. Returns the bearer token.
pub fn create_session(conn: &Connection, user_id: i64, hours: u64) -> rusqlite::Result<String> {
    let token = generate_token();
    let now = Utc::now();
    let expires_at = now + Duration::hours(hours.min(MAX_SESSION_HOURS) as i64);

    conn.execute(
        "INSERT INTO sessions (token, user_id, expires_at, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![token, user_id, expires_at, now],
    )?;

    Ok(token)
}

/// Resolve an unexpired token to its user id.
pub fn session_user_id(conn: &Connection, token: &str) -> rusqlite::Result<Option<i64>> {
    conn.query_row(
        "SELECT user_id FROM sessions WHERE token = ?1 AND expires_at > ?2",
        params![token, Utc::now()],
        |row| row.get(0),
    )
    .optional()
}

/// Delete a session by token. Returns whether a session was removed.
pub fn delete_session(conn: &Connection, token: &str) -> rusqlite::Result<bool> {
    let rows = conn.execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
    Ok(rows > 0)
}

/// Drop every expired session.
pub fn purge_expired(conn: &Connection) -> rusqlite::Result<usize> {
    conn.execute(
        "DELETE FROM sessions WHERE expires_at <= ?1",
        params![Utc::now()],
    )
}

/// Generate a cryptographically random 32-byte hex token.
fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    hex::encode(bytes)
}
