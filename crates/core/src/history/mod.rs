pub mod history_model;
pub mod history_service;

pub use history_model::{AggregatedHistory, CategorySeries, Period, SeriesPoint, TimeSeries};
pub use history_service::HistoryAggregator;
