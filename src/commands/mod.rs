//! Command surface: clap definitions and the handlers behind each subcommand.
//! Every handler returns a serializable payload printed as JSON.

pub mod cli;
pub mod gate_cmds;
pub mod report_cmds;

use serde::Serialize;
use serde_json::Value;

use crate::database::{pool, schema};
use crate::services::config;
use crate::services::gate::promotion::PromotionOutcome;
use crate::services::pipeline::orchestrator;
use crate::types::errors::MapperResult;
use cli::{Cli, Command};

#[derive(Debug, Clone, Serialize)]
pub struct CommandOutput {
    pub payload: Value,
    /// False when a gate refused the run; the process exits non-zero.
    pub success: bool,
}

impl CommandOutput {
    fn ok<T: Serialize>(payload: &T) -> MapperResult<Self> {
        Ok(Self {
            payload: serde_json::to_value(payload)?,
            success: true,
        })
    }

    fn gated<T: Serialize>(payload: &T, success: bool) -> MapperResult<Self> {
        Ok(Self {
            payload: serde_json::to_value(payload)?,
            success,
        })
    }
}

fn promotion_succeeded(outcome: &PromotionOutcome) -> bool {
    !matches!(outcome, PromotionOutcome::Refused { .. })
}

pub async fn execute(cli: Cli) -> MapperResult<CommandOutput> {
    let create = matches!(cli.command, Command::Init);
    let db = pool::connect(&cli.database, create).await?;
    let config_path = cli.config.as_deref();

    let output = match cli.command {
        Command::Init => {
            schema::ensure_schema(&db).await?;
            log::info!("Schema ready at {}", cli.database);
            CommandOutput::ok(&serde_json::json!({ "database": cli.database, "ready": true }))?
        }
        Command::Run(args) => {
            let config = config::load_config(config_path)?;
            let summary = orchestrator::run_mapping(&db, &config, &args.into()).await?;
            let success = summary
                .promotion
                .as_ref()
                .map(promotion_succeeded)
                .unwrap_or(true);
            CommandOutput::gated(&summary, success)?
        }
        Command::Debug { ingredient, top_k } => {
            let config = config::load_config(config_path)?;
            let debug = orchestrator::debug_ingredient(&db, &config, &ingredient, top_k).await?;
            CommandOutput::ok(&debug)?
        }
        Command::Validate { run_id } => {
            let outcome = gate_cmds::validate_command(&db, &run_id, config_path).await?;
            CommandOutput::gated(&outcome, outcome.passed())?
        }
        Command::Promote { run_id } => {
            let outcome = gate_cmds::promote_command(&db, &run_id, config_path).await?;
            CommandOutput::gated(&outcome, promotion_succeeded(&outcome))?
        }
        Command::Rollback { run_id } => {
            CommandOutput::ok(&gate_cmds::rollback_command(&db, &run_id).await?)?
        }
        Command::Status { limit } => CommandOutput::ok(&report_cmds::status_report(&db, limit).await?)?,
        Command::Gaps { run_id, limit } => {
            CommandOutput::ok(&report_cmds::gap_report(&db, run_id, limit).await?)?
        }
        Command::Clusters { min_frequency } => {
            CommandOutput::ok(&report_cmds::cluster_report(&db, min_frequency).await?)?
        }
        Command::Suggest {
            min_frequency,
            min_count,
            run_id,
        } => {
            let config = config::load_config(config_path)?;
            let report =
                report_cmds::suggestion_report(&db, &config, min_frequency, min_count, run_id)
                    .await?;
            CommandOutput::ok(&report)?
        }
    };

    db.close().await;
    Ok(output)
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
