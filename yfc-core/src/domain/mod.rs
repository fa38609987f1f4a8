//! Domain types for yfc

pub mod quote;

pub use quote::Quote;
