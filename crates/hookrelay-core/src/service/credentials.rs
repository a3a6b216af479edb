//! CredentialSource trait for reading stored provider credentials.
//!
//! The core never touches the process environment. The outer crate supplies
//! an implementation (environment variables in production) and the pipeline
//! receives the stored blobs as plain parameters.

use hookrelay_types::credential::StoredCredentials;

pub trait CredentialSource: Send + Sync {
    /// Read the stored credentials. Absent values come back empty and fail
    /// later at decryption.
    fn load(&self) -> StoredCredentials;
}
