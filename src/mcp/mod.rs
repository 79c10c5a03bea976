//! MCP (Model Context Protocol) server exposing gBizINFO lookups as tools.
//!
//! ```text
//! MCP client ──JSON-RPC over stdio──▶ McpServer ──▶ ToolHandlers ──▶ CompanySearchController
//!
//! Tools:
//!   search              - composite search (at least one identifying field)
//!   search_companies    - name-only search
//!   get_basic_info ...  - per-company lookups by corporate number (8 tools)
//!   get_update_info     - companies updated within a period
//! ```
//!
//! stdout carries the protocol; logs go to stderr.

pub mod handlers;
pub mod protocol;
pub mod server;
pub mod tools;

pub use handlers::ToolHandlers;
pub use server::McpServer;
