//! MurmurHash64A fingerprints, plus the containers and tools built on them.

pub mod dedup;
pub mod fingerprint_set;
pub mod hashers;
pub mod murmur;
pub mod vocab;

pub use fingerprint_set::FingerprintSet;
pub use hashers::{BuildMurmur64, Murmur64Hasher};
pub use murmur::hash64;
