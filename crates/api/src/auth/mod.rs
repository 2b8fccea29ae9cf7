//! Verification of access tokens issued by the hosted auth provider.
//!
//! Clienter never issues or refreshes tokens; it only checks the signature,
//! expiry and audience of the bearer token and trusts its `sub` claim as the
//! user id.

pub mod jwt;
