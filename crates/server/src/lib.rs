pub mod api;
pub mod metrics;
pub mod pages;
pub mod state;
