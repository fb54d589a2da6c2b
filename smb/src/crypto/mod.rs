pub mod kdf;
pub mod ntlm_v2;
pub mod signer;

pub use signer::{Signer, SigningAlgorithm};
