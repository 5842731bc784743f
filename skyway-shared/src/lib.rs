pub mod crypto;
pub mod pii;
