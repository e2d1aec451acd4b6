pub mod provider;

pub use provider::{Field, ParseSortModeError, Provider, SortMode};
