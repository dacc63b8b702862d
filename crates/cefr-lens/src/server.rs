//! MCP (Model Context Protocol) server implementation.
//!
//! Exposes vocabulary profiling over MCP so AI assistants can check whether
//! a text suits a learner's level. The server is a presentation layer over
//! the same core library the CLI uses; the lexicon is loaded once and shared
//! by every tool call.

use std::sync::Arc;

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};

use cefr_lens_core::annotate::RuleAnnotator;
use cefr_lens_core::profile::{self, AnalyzeOptions};
use cefr_lens_core::{CefrLevel, Lexicon};

use crate::commands::lookup::lookup_words;

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for the `analyze_vocabulary` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct AnalyzeVocabularyParams {
    /// The English text to profile.
    pub text: String,
    /// Maximum number of unknown words to list.
    pub sample_size: Option<usize>,
    /// Highest acceptable primary level; the result reports whether the text fits.
    pub max_level: Option<CefrLevel>,
}

/// Parameters for the `lookup_words` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct LookupWordsParams {
    /// Words to look up.
    pub words: Vec<String>,
}

/// MCP server exposing CEFR vocabulary tools.
#[derive(Clone)]
pub struct VocabularyServer {
    lexicon: Arc<Lexicon>,
    options: AnalyzeOptions,
    max_input_bytes: Option<usize>,
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
}

#[tool_router]
impl VocabularyServer {
    /// Create a server around a loaded lexicon.
    pub fn new(lexicon: Arc<Lexicon>, options: AnalyzeOptions, max_input_bytes: Option<usize>) -> Self {
        Self {
            lexicon,
            options,
            max_input_bytes,
            tool_router: Self::tool_router(),
        }
    }

    /// Get project information.
    #[tool(description = "Get project name, version, description and lexicon size")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "cefrDictionarySize": self.lexicon.len(),
        });

        let text = if params.format == "json" {
            serde_json::to_string_pretty(&info)
                .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?
        } else {
            format!(
                "{} v{}\n{}\n{} words in CEFR dictionary",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
                self.lexicon.len(),
            )
        };

        tracing::info!(tool = "get_info", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Profile the vocabulary of a text.
    #[tool(
        description = "Classify the vocabulary of English text by CEFR level (A1-C2). Returns per-level counts and percentages, a difficulty score, the primary level and a sample of unknown words. Proper names are excluded."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", text_len = params.text.len()))]
    fn analyze_vocabulary(
        &self,
        Parameters(params): Parameters<AnalyzeVocabularyParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "analyze_vocabulary", max_level = ?params.max_level, "executing MCP tool");

        if let Some(max) = self.max_input_bytes
            && params.text.len() > max
        {
            return Err(McpError::invalid_params(
                format!(
                    "input too large: {} bytes (limit: {max} bytes)",
                    params.text.len()
                ),
                None,
            ));
        }

        let mut options = self.options;
        if let Some(sample_size) = params.sample_size {
            options.sample_size = sample_size;
        }
        let annotator = RuleAnnotator::new().with_vocabulary(&self.lexicon);
        let report = profile::analyze_text(&params.text, &annotator, &self.lexicon, &options)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        let mut value = serde_json::to_value(&report)
            .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;
        value["cefrDictionarySize"] = self.lexicon.len().into();
        if let Some(max) = params.max_level {
            value["maxLevel"] = max.as_str().into();
            value["withinMaxLevel"] = (!report.exceeds(max)).into();
        }
        let json = serde_json::to_string_pretty(&value)
            .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;

        tracing::info!(
            tool = "analyze_vocabulary",
            total_words = report.total_words,
            primary_level = %report.primary_level,
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Look up individual words.
    #[tool(description = "Look up the CEFR level of individual English words. Unknown words have a null level.")]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", words = params.words.len()))]
    fn lookup_words(
        &self,
        Parameters(params): Parameters<LookupWordsParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "lookup_words", "executing MCP tool");

        let results = lookup_words(&self.lexicon, &params.words);
        let json = serde_json::to_string_pretty(&results)
            .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;

        tracing::info!(tool = "lookup_words", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl ServerHandler for VocabularyServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Use analyze_vocabulary to grade a text against CEFR levels and lookup_words for single words.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}
