//! UI Components

pub mod chart;
pub mod kpi_card;
pub mod toast;

pub use chart::TerminationsChart;
pub use kpi_card::KpiCard;
pub use toast::Toast;
