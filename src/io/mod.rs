/// CSV export for forecasts.
pub mod export;
