pub mod backtest;
pub mod candidates;
pub mod forecast_model;
pub mod regression;
pub mod selection;

pub use forecast_model::{CandidateScore, ForecastConfig, ForecastMethod, ForecastResult};
pub use regression::{ArxRegression, RegressionOutcome};
pub use selection::{forecast_series, round_minor_to_unit, SeriesForecast};
