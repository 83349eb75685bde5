//! Table engine for the company list.
//!
//! Columns are discovered from the data itself, since records are
//! heterogeneous. The visible row set is a pure function of the records,
//! the columns and a [`ViewState`].

pub mod columns;
pub mod format;
pub mod view;

pub use columns::{derive_columns, get_value, lookup, ColumnKey, ColumnKeyError};
pub use format::{format_currency, format_detail, format_display, format_percent, ABSENT};
pub use view::{compute_view, compute_view_indices, total_annual_revenue, SortDirection, ViewState};
