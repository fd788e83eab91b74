use clap::Parser;

pub mod commands;
pub mod database;
pub mod services;
pub mod types;
#[cfg(test)]
pub mod test_utils;

/// CLI entry point: parse arguments, execute one command, print its JSON
/// payload on stdout. Logs go to stderr (`RUST_LOG`, default `info`).
pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = commands::cli::Cli::parse();
    let runtime = tokio::runtime::Runtime::new()?;
    let output = runtime.block_on(commands::execute(cli))?;

    println!("{}", serde_json::to_string_pretty(&output.payload)?);
    if !output.success {
        anyhow::bail!("tripwire gate refused the run");
    }
    Ok(())
}
