//! Encryption engine adapter
//!
//! The pipeline only needs one capability from an engine: turn a document's
//! bytes plus a password into encrypted bytes, or explain why not. Anything
//! implementing [`EncryptionEngine`] can drive a batch; [`QpdfEngine`] is the
//! production adapter around the `qpdf` executable.

use std::sync::Arc;

use crate::error::EngineError;

pub mod qpdf;

pub use qpdf::{EngineState, QpdfEngine, QpdfOptions};

/// Encrypts one document with identical user and owner passwords.
///
/// Implementations are shared by every worker of a batch, so they must be
/// callable concurrently. A call must not leave temporary files behind,
/// whether it succeeds or fails.
pub trait EncryptionEngine: Send + Sync {
    fn encrypt_document(&self, input: &[u8], password: &str) -> Result<Vec<u8>, EngineError>;
}

impl<E: EncryptionEngine + ?Sized> EncryptionEngine for &E {
    fn encrypt_document(&self, input: &[u8], password: &str) -> Result<Vec<u8>, EngineError> {
        (**self).encrypt_document(input, password)
    }
}

impl<E: EncryptionEngine + ?Sized> EncryptionEngine for Arc<E> {
    fn encrypt_document(&self, input: &[u8], password: &str) -> Result<Vec<u8>, EngineError> {
        (**self).encrypt_document(input, password)
    }
}

impl<E: EncryptionEngine + ?Sized> EncryptionEngine for Box<E> {
    fn encrypt_document(&self, input: &[u8], password: &str) -> Result<Vec<u8>, EngineError> {
        (**self).encrypt_document(input, password)
    }
}
