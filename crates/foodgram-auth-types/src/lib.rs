//! Auth types shared across Foodgram crates.
//!
//! Provides JWT validation (and, behind a feature, issuance) plus the
//! bearer-token `Identity` / `MaybeIdentity` extractors.

pub mod identity;
pub mod token;
