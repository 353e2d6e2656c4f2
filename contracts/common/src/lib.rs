//! Shared access-control helpers for the staking contracts.
//!
//! [`access`] holds the admin tier registry and the rewards-burner grants a
//! ledger hands to its successor during a reward migration. Contracts keep
//! their own error enums and map a failed check to their `Unauthorized`
//! variant.

#![no_std]

pub mod access;

pub use access::*;
