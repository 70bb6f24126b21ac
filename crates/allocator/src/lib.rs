//! Automated budget reallocation across an organization's campaigns:
//! equal, performance-weighted, ROI-weighted, and forecast-weighted
//! strategies with min-budget and shift-band constraints.

pub mod allocator;

pub use allocator::{BudgetAllocator, ReallocationReport, SimulationReport};
