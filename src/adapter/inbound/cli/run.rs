//! CLI entry: load config, build the service, serve one request.

use std::process::ExitCode;

use anyhow::Context;
use tracing::debug;

use crate::adapter::inbound::cli::command::Cli;
use crate::adapter::inbound::cli::output;
use crate::application::service::{Reply, ReplyStatus};
use crate::infrastructure::bootstrap::build_service;
use crate::infrastructure::config::settings::Config;

/// Exit code for a rejected request.
pub const EXIT_BAD_REQUEST: u8 = 2;
/// Exit code for a served request whose body has `ok: false`.
pub const EXIT_NOT_OK: u8 = 1;

/// Map a reply to the process exit code.
#[must_use]
pub fn exit_code(reply: &Reply) -> ExitCode {
    match reply.status {
        ReplyStatus::BadRequest => ExitCode::from(EXIT_BAD_REQUEST),
        ReplyStatus::Ok if reply.body.ok => ExitCode::SUCCESS,
        ReplyStatus::Ok => ExitCode::from(EXIT_NOT_OK),
    }
}

/// Execute the parsed command line.
///
/// # Errors
///
/// Returns an error when the configuration cannot be loaded or the service
/// cannot be built. Request-level failures are reported through the body
/// and exit code instead.
pub async fn execute(cli: &Cli) -> anyhow::Result<ExitCode> {
    let config = Config::load_or_default(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("failed to load config from {}", path.display()),
        None => "failed to build default config".to_string(),
    })?;
    config.init_logging(cli.verbose);

    let service = build_service(&config).context("failed to build service")?;
    let params = cli.command.to_params();
    debug!(?params, "Dispatching request");

    let reply = service.handle(&params).await;
    if cli.json {
        output::print_json(&reply.body).context("failed to serialize response")?;
    } else {
        output::print_human(&reply.body);
    }
    Ok(exit_code(&reply))
}
