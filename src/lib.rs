pub mod autocomplete;
pub mod chart;
pub mod dataset;
pub mod export;
pub mod loader;
pub mod roster;
pub mod state;
