//! Load, filter, split and combine CSV files.
//!
//! [`data`] holds the stateless operations; [`session::Session`] is the
//! per-user state a host application carries between actions.

pub mod data;
pub mod session;
