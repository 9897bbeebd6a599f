use std::time::Duration;

use clap::Parser;
use nightdriver::cli::Cli;
use nightdriver::config::RootConfig;
use nightdriver::{assembly, status};
use nd_site::SiteRegistry;

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    let config = match &cli.config {
        Some(path) => match RootConfig::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("fatal: {e}");
                std::process::exit(1);
            }
        },
        None => {
            log::info!("no --config given, running the compiled-in demo site");
            RootConfig::demo()
        }
    };

    let sites = match assembly::build_sites(&config) {
        Ok(sites) => sites,
        Err(e) => {
            log::error!("fatal: {e}");
            std::process::exit(1);
        }
    };

    log::info!("starting {} site(s)", sites.len());
    let registry = SiteRegistry::start_all(sites);
    status::run_status_loop(&registry, Duration::from_secs(cli.status_interval_secs));
}
