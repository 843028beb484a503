//! tally-report: category table, chart series, pagination and the advisor digest

pub mod category_table;
pub mod chart;
pub mod digest;
pub mod pagination;

pub use category_table::{CategoryRow, CategoryTable, SortKey, SortOrder};
pub use chart::{bar_series, flow_slices, BarPoint, Slice, SliceKind};
pub use digest::SummaryDigest;
pub use pagination::{paginate, preview, Page, PREVIEW_ROWS};
