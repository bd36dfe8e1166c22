//! MCP service implementation using rmcp.
//!
//! This module binds the six database tools to the MCP protocol via the rmcp
//! framework's macros. Every tool returns exactly one text content block -
//! success payloads, confirmation prompts, and errors all travel the same
//! channel so the calling agent can branch on content without a status code.

use crate::db::{ConnectionProvider, StatementExecutor};
use crate::models::DEFAULT_SAMPLE_LIMIT;
use crate::tools::format;
use crate::tools::{QueryToolHandler, SchemaToolHandler, WriteToolHandler};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;

fn default_schema() -> String {
    "public".to_string()
}

fn default_sample_limit() -> i64 {
    DEFAULT_SAMPLE_LIMIT
}

/// Input for the list_tables tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListTablesInput {
    /// Name of the schema to list tables from
    #[serde(default = "default_schema")]
    pub schema_name: String,
}

/// Input for the describe_table tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DescribeTableInput {
    /// Name of the table to describe
    pub table_name: String,
    /// Name of the schema containing the table
    #[serde(default = "default_schema")]
    pub schema_name: String,
}

/// Input for the execute_select_query tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExecuteSelectInput {
    /// The SELECT SQL query to execute
    pub sql_query: String,
}

/// Input for the execute_write_query tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExecuteWriteInput {
    /// The SQL query to execute (INSERT, UPDATE, DELETE, DDL, ...)
    pub sql_query: String,
    /// Whether the end user has confirmed execution
    #[serde(default)]
    pub confirmed: bool,
}

/// Input for the get_sample_data tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetSampleDataInput {
    /// Name of the table to sample
    pub table_name: String,
    /// Name of the schema containing the table
    #[serde(default = "default_schema")]
    pub schema_name: String,
    /// Number of rows to return
    #[serde(default = "default_sample_limit")]
    pub limit: i64,
}

#[derive(Clone)]
pub struct AgentDbService {
    /// Shared connection provider for all database operations
    provider: Arc<ConnectionProvider>,
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

impl AgentDbService {
    /// Create a new service instance around the shared connection provider.
    pub fn new(provider: Arc<ConnectionProvider>) -> Self {
        Self {
            provider,
            tool_router: Self::tool_router(),
        }
    }

    fn text(content: String) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(content)]))
    }
}

#[tool_router]
impl AgentDbService {
    #[tool(
        description = "List all schemas in the database. Use this tool when you need to explore what schemas are available. System schemas are excluded."
    )]
    async fn list_schemas(&self) -> Result<CallToolResult, McpError> {
        let handler = SchemaToolHandler::new(self.provider.clone());
        Self::text(format::schema_listing(handler.list_schemas().await))
    }

    #[tool(
        description = "List all tables in a specific schema.\nReturns a formatted listing of table names, or an explicit message when the schema is empty."
    )]
    async fn list_tables(
        &self,
        Parameters(input): Parameters<ListTablesInput>,
    ) -> Result<CallToolResult, McpError> {
        let handler = SchemaToolHandler::new(self.provider.clone());
        let result = handler.list_tables(&input.schema_name).await;
        Self::text(format::table_listing(&input.schema_name, result))
    }

    #[tool(
        description = "Describe the structure of a specific table: columns with types and nullability, primary key, and foreign keys."
    )]
    async fn describe_table(
        &self,
        Parameters(input): Parameters<DescribeTableInput>,
    ) -> Result<CallToolResult, McpError> {
        let handler = SchemaToolHandler::new(self.provider.clone());
        let result = handler
            .describe_table(&input.table_name, &input.schema_name)
            .await;
        Self::text(format::table_description(result))
    }

    #[tool(
        description = "Execute a SELECT query (DQL) on the database.\nRead-only queries run without confirmation. At most 100 result rows are rendered; a larger result reports the omitted remainder."
    )]
    async fn execute_select_query(
        &self,
        Parameters(input): Parameters<ExecuteSelectInput>,
    ) -> Result<CallToolResult, McpError> {
        let handler = QueryToolHandler::new(self.provider.clone());
        let result = handler.execute_select(&input.sql_query).await;
        Self::text(format::select_result(&input.sql_query, result))
    }

    #[tool(
        description = "Execute a write query (DML, DDL, DCL, or TCL) on the database.\nMutating queries require confirmation: the first call returns a CONFIRMATION_REQUIRED prompt, and the query only executes when re-invoked with confirmed=true after the end user has explicitly agreed."
    )]
    async fn execute_write_query(
        &self,
        Parameters(input): Parameters<ExecuteWriteInput>,
    ) -> Result<CallToolResult, McpError> {
        let executor = StatementExecutor::new(self.provider.clone());
        let handler = WriteToolHandler::new(executor);
        let result = handler
            .execute_write(&input.sql_query, input.confirmed)
            .await;
        Self::text(format::write_result(&input.sql_query, result))
    }

    #[tool(
        description = "Get sample data from a table to understand its content.\nThe table name is validated against the catalog and the row limit is capped at 100."
    )]
    async fn get_sample_data(
        &self,
        Parameters(input): Parameters<GetSampleDataInput>,
    ) -> Result<CallToolResult, McpError> {
        let handler = QueryToolHandler::new(self.provider.clone());
        let result = handler
            .sample_data(&input.table_name, &input.schema_name, input.limit)
            .await;
        Self::text(format::sample_data_result(result))
    }
}

#[tool_handler]
impl ServerHandler for AgentDbService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "sql-agent-mcp".to_owned(),
                title: Some("SQL Agent MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Database tools for exploring and querying a PostgreSQL database.\n\
                \n\
                ## Workflow\n\
                1. Call `list_schemas` to discover available schemas\n\
                2. Call `list_tables` and `describe_table` to understand structure\n\
                3. Use `execute_select_query` for read-only queries (SELECT/WITH)\n\
                4. Use `execute_write_query` for anything that modifies the database\n\
                \n\
                ## Write confirmation\n\
                Mutating statements never run on the first call. The server replies with\n\
                a block starting with CONFIRMATION_REQUIRED that echoes the detected\n\
                query type and the statement. Ask the end user for an explicit yes/no,\n\
                then re-invoke `execute_write_query` with the identical statement and\n\
                confirmed=true. The server holds no pending state between the two calls.\n\
                \n\
                ## Results\n\
                Every tool returns a single text block. Failures are returned as text\n\
                starting with `Error` rather than protocol errors, so inspect the\n\
                content of each response."
                    .to_string(),
            ),
        }
    }
}
