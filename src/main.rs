use package_info::cli::{Cli, GlobalFlags};
use package_info::config::LookupConfig;
use package_info::executor::LookupExecutor;
use package_info::fetch::HttpFetcher;
use package_info::lookup::LookupPipeline;
use package_info::VERSION;

use clap::Parser;
use std::env;
use std::sync::Arc;
use tracing::{debug, error, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli.global);

    debug!("pkginfo v{} starting", VERSION);
    debug!("Arguments: {:?}", cli);

    std::process::exit(run(cli).await);
}

async fn run(cli: Cli) -> i32 {
    let mut config = match LookupConfig::load_or_default(cli.global.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    if let Some(max_results) = cli.global.max_results {
        config.max_results = max_results;
    }
    config.verbose |= cli.global.verbose;

    let fetcher = match HttpFetcher::new(config.request_timeout()) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let executor = LookupExecutor::new(config.concurrency);
    let queries = cli.command.queries(config.verbose);
    let pipeline = Arc::new(LookupPipeline::new(fetcher).with_config(config));

    let mut exit_code = 0;
    for outcome in executor.execute_all(pipeline, queries).await {
        match outcome {
            Ok(result) if cli.global.json => match serde_json::to_string(&result.result_set) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error: failed to serialize result: {}", e);
                    exit_code = 1;
                }
            },
            Ok(result) => println!("{}", result.summary),
            Err(e) if e.is_negative() => {
                eprintln!("{}", e);
                exit_code = 1;
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                exit_code = 1;
            }
        }
    }
    exit_code
}

fn init_logging(flags: &GlobalFlags) {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let level = if let Some(level_str) = &flags.log_level {
            parse_level(level_str)
        } else if let Ok(level_str) = env::var("PKGINFO_LOG_LEVEL") {
            parse_level(&level_str)
        } else if flags.quiet {
            Level::ERROR
        } else {
            Level::WARN
        };

        let mut filter = EnvFilter::from_default_env();

        if env::var("RUST_LOG").is_err() {
            for directive in [
                format!("package_info={}", level),
                format!("pkginfo={}", level),
                "hyper=warn".to_string(),
                "reqwest=warn".to_string(),
                "html5ever=error".to_string(),
            ] {
                if let Ok(directive) = directive.parse() {
                    filter = filter.add_directive(directive);
                }
            }
        }

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    });
}

fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to WARN. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::WARN
        }
    }
}
