pub mod analysis;
pub mod chart;
pub mod config;
pub mod core;
pub mod data;
pub mod domain;
pub mod geo;
pub mod render;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{DashboardConfig, LocalStorage};

pub use core::{engine::DashboardEngine, pipeline::DashboardPipeline};
pub use domain::section::Section;
pub use render::{render_html, render_section, RenderedDashboard};
pub use utils::error::{DashError, Result};
