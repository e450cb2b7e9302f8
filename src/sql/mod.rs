//! SQL emission.
//!
//! - [`query`] - statement assembly ([`QueryBuilder`]) and the [`Query`] result
//! - [`ident`] - identifier quoting and layer table names

pub mod ident;
pub mod query;


pub use ident::{quote_backtick, LayerTable};
pub use query::{Condition, Parameter, Query, QueryBuilder};
