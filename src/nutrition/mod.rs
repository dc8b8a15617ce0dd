//! Nutrition calculation module
//!
//! Stateless aggregation of selections and goal progress.

pub mod aggregator;
pub mod progress;

pub use aggregator::{
    compute_percentages, compute_totals, format_selection_summary, percent_of_goal,
    progress_percent, progress_percentages,
};
pub use progress::{progress_report, ProgressRow};
