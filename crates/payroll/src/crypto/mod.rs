//! AES-GCM salary encryption primitives.
//!
//! This module is intentionally free of HTTP and storage dependencies. It
//! provides the low-level encrypt/decrypt operations and the [`Encrypter`] seam
//! that the employee service calls through.
//!
//! # Ciphertext format
//!
//! ```text
//! <base64(nonce)>$<base64(ciphertext+tag)>
//! ```
//!
//! Standard base64 alphabet with padding, so `$` can never occur inside a
//! segment. The format carries no key identifier; values stay readable only
//! under the key that wrote them.

pub mod cipher;
pub mod encrypter;

pub use cipher::CryptoError;
pub use encrypter::{AesGcmEncrypter, Encrypter};
