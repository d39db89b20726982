use crate::config::Config;
use crate::db::connection::{init_db, Database};
use crate::pipeline::Pipeline;
use std::env;
use std::process;

mod config;
mod db;
mod domain;
mod errors;
mod notifier;
mod pipeline;
mod registry;
mod scheduler;

fn usage() -> ! {
    eprintln!("Usage: prospect_pipeline <crawl [--now] | notify [--digest]>");
    process::exit(1);
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("crawl");
    let has_flag = |flag: &str| args.iter().any(|a| a == flag);

    let config = Config::from_env();
    let db = Database::new(config.db_path.clone());

    if let Err(e) = init_db(&db) {
        eprintln!("❌ Database initialization failed: {e}");
        process::exit(1);
    }

    let pipeline = match Pipeline::new(config, db) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("❌ Pipeline init failed: {e}");
            process::exit(1);
        }
    };

    let result = match command {
        "crawl" => {
            if has_flag("--now") {
                pipeline.run_full()
            } else {
                scheduler::run_loop(&pipeline)
            }
        }
        "notify" => {
            if has_flag("--digest") {
                pipeline.run_digest()
            } else {
                pipeline.run_alert_pass()
            }
        }
        _ => usage(),
    };

    if let Err(e) = result {
        eprintln!("❌ Pipeline run failed: {e}");
        process::exit(1);
    }

    println!("✅ Done");
}
