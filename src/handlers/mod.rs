//! Transport-free operation layer. Each function takes the store and the
//! caller identity, performs the policy and lifecycle checks in the order
//! the HTTP surface promises (role, then body validation, then lookup, then
//! ownership, then state), and only then mutates.

pub mod auth;
pub mod students;
pub mod teachers;
