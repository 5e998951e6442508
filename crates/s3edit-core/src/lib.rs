//! Core library for s3edit
//!
//! Provides:
//! - Credential resolution from flags and `~/.aws/credentials`
//! - AWS Signature Version 4 request signing
//! - Signed GET/PUT against an S3 bucket
//! - A bridge to the user's external text editor
//! - Edge-cache purge for object paths

pub mod client;
pub mod credentials;
pub mod editor;
pub mod error;
pub mod purge;
pub mod sign;

pub use client::{FetchResult, ObjectLocation, ObjectStoreClient, DEFAULT_CONTENT_TYPE};
pub use credentials::{CredentialOverrides, Credentials, DEFAULT_REGION};
pub use editor::edit_in_editor;
pub use error::{Error, Operation, Result};
pub use purge::CachePurger;
pub use sign::Signer;
