//! Domain types: bars and column views.

pub mod bar;
pub mod columns;

pub use bar::{canonicalize, Bar};
pub use columns::PriceColumns;
