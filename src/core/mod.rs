pub mod controller;
pub mod http;
pub mod mapper;
pub mod presenter;
pub mod query;
pub mod service;
pub mod validator;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::CompanySearchController;
pub use http::{HttpClient, HttpRequestOptions};
pub use service::GbizinfoService;
