//! Serve command: MCP server on stdio.

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use rmcp::ServiceExt;
use tracing::{info, instrument};

use cefr_lens_core::config::Config;

use super::load_lexicon;
use crate::server::VocabularyServer;

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// CEFR vocabulary CSV (default: search the resources folders).
    #[arg(long, visible_alias = "cefr", value_name = "CSV")]
    pub lexicon: Option<Utf8PathBuf>,
}

/// Load the lexicon once and serve MCP requests until stdin closes.
#[instrument(name = "cmd_serve", skip_all)]
pub async fn cmd_serve(
    args: ServeArgs,
    config: &Config,
    cwd: &Utf8Path,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let lexicon = Arc::new(load_lexicon(args.lexicon.as_deref(), config, cwd)?);
    info!(lexicon = lexicon.len(), "starting MCP server on stdio");

    let server = VocabularyServer::new(lexicon, config.analyze_options(), max_input_bytes);
    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .map_err(|e| anyhow::anyhow!("failed to start MCP server: {e}"))?;
    let reason = service
        .waiting()
        .await
        .map_err(|e| anyhow::anyhow!("MCP server task failed: {e}"))?;

    info!(?reason, "MCP server stopped");
    Ok(())
}
