#![recursion_limit = "256"]

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod mcp;
pub mod utils;

pub use adapters::ReqwestTransport;
#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::AppConfig;
pub use core::{CompanySearchController, GbizinfoService, HttpClient};
pub use domain::model::{Company, CompanyFilter, DetailKind, PaginatedResult, UpdateInfoPage};
pub use mcp::McpServer;
pub use utils::error::{GbizError, Result};

/// 以 reqwest transport 組裝的 controller
pub fn build_controller(config: &AppConfig) -> CompanySearchController<ReqwestTransport> {
    CompanySearchController::new(GbizinfoService::from_config(
        ReqwestTransport::new(),
        config,
    ))
}
