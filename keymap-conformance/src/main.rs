use std::process::ExitCode;

use keymap_conformance::{load_config, runner};

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let cfg = match load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt().with_max_level(cfg.level()).init();

    match runner::run(&cfg) {
        Ok(summaries) => {
            for summary in summaries {
                tracing::info!(
                    backing = ?summary.backing,
                    cases = summary.cases,
                    ops = summary.ops,
                    "backing conforms"
                );
            }
            ExitCode::SUCCESS
        }
        Err(failure) => {
            tracing::error!(%failure, "conformance failure");
            ExitCode::FAILURE
        }
    }
}
