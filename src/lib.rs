//! SQL Agent MCP Server Library
//!
//! This library provides MCP (Model Context Protocol) tools for AI agents
//! to explore and query a PostgreSQL database. Mutating statements are held
//! behind a two-phase confirmation handshake.

pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use error::ServerError;
pub use mcp::AgentDbService;
