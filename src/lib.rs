//! rosterd: role-based academic record administration service.
//!
//! Admins manage the student roster and teacher assignments; teachers enter
//! progress/final grades and finalize records. A finalized record is
//! immutable except for the admin unfinalize override. The interesting part
//! is the policy and lifecycle layer; the HTTP surface and SQLite store are
//! thin shells around it.

pub mod error;
pub mod handlers;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod policy;
pub mod seed;
pub mod store;
