use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::services::clusters::DEFAULT_SUGGEST_MIN_COUNT;
use crate::services::pipeline::RunOptions;

#[derive(Parser, Debug)]
#[command(name = "lexmap")]
#[command(about = "Deterministic lexical mapping of recipe ingredients to reference foods", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// SQLite database (file path or sqlite: URL)
    #[arg(long, env = "LEXMAP_DATABASE_URL", global = true, default_value = "lexmap.db")]
    pub database: String,

    /// Mapper configuration JSON (defaults when omitted)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the database file and apply the schema
    Init,

    /// Score the vocabulary and stage a new run
    Run(RunArgs),

    /// Show the top candidates for one ingredient without writing
    Debug {
        ingredient: String,

        #[arg(short = 'k', long, default_value = "10")]
        top_k: usize,
    },

    /// Run the tripwire gate for a staged or failed run
    Validate { run_id: String },

    /// Gate and promote a run
    Promote { run_id: String },

    /// Re-point to a previously promoted run
    Rollback { run_id: String },

    /// Active pointer and recent runs
    Status {
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Needs-review and no-match rows of a run (active run by default)
    Gaps {
        #[arg(long)]
        run_id: Option<String>,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Synonym clusters over the ingredient vocabulary
    Clusters {
        #[arg(long, default_value = "5")]
        min_frequency: i64,
    },

    /// Propose entries for clusters the active (or given) run leaves unmapped
    Suggest {
        #[arg(long, default_value = "5")]
        min_frequency: i64,

        /// Minimum total usage of a cluster
        #[arg(long, default_value_t = DEFAULT_SUGGEST_MIN_COUNT)]
        min_count: i64,

        #[arg(long)]
        run_id: Option<String>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Score and report without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Promote the run when the tripwire gate passes
    #[arg(long)]
    pub promote: bool,

    /// Persist signal breakdowns for the winner and each near-tie
    #[arg(long)]
    pub include_breakdowns: bool,

    /// Persist near-tie candidates
    #[arg(long)]
    pub include_near_ties: bool,

    /// Only the N most frequent ingredients
    #[arg(long)]
    pub top_n: Option<usize>,

    #[arg(long)]
    pub min_frequency: Option<i64>,

    /// Score a single ingredient
    #[arg(long)]
    pub ingredient: Option<String>,

    /// Explicit run id (generated otherwise)
    #[arg(long)]
    pub run_id: Option<String>,
}

impl From<RunArgs> for RunOptions {
    fn from(args: RunArgs) -> Self {
        RunOptions {
            dry_run: args.dry_run,
            promote: args.promote,
            include_breakdowns: args.include_breakdowns,
            include_near_ties: args.include_near_ties,
            top_n: args.top_n,
            min_frequency: args.min_frequency,
            single_ingredient: args.ingredient,
            run_id: args.run_id,
        }
    }
}
