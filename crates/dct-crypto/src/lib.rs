//! Cryptographic primitives for DCT: Ed25519 signing, BLAKE2b-256
//! hashing, RFC 8785 canonical JSON, and principal-ID derivation.
//!
//! Every signature in this workspace covers `blake2b256(canonicalize(v))`
//! for some value `v` with its `signature` field elided, never the raw
//! serialized bytes of `v` directly — see [`sign_object`] and
//! [`verify_object_signature`].

pub mod canonical;
pub mod error;
pub mod keypair;
pub mod primitives;

pub use canonical::canonicalize;
pub use error::CryptoError;
pub use keypair::{KeyPair, PublicKey};
pub use primitives::{blake2b256, principal_id, sign, sign_object, verify, verify_object_signature};
