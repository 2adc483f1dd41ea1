pub mod fingerprint;
pub mod password;
pub mod session;

pub use fingerprint::{client_ip, fingerprint_hash};
