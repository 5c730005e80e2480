use anyhow::Result;
use taskboard::api::Api;
use taskboard::cli;
use taskboard::config::Config;
use taskboard::logger::{self, CustomLogger, LogBuffer};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli::build().get_matches();

    let level = logger::level_for_verbosity(matches.occurrences_of("verbose"));
    let logger = CustomLogger::new(level).install()?;
    let logs = LogBuffer::new();
    // The board view owns the terminal, so records go to its log panel
    if matches.subcommand_name() == Some("board") {
        logger.set_log_callback(logs.callback());
    } else {
        logger.set_log_callback(Box::new(|entry| eprintln!("{}", entry)));
    }

    let mut config = Config::new();
    config.load(matches.value_of("config"))?;
    let api = Api::new(&config.api_url, config.session());

    if let Err(e) = cli::run(&matches, &config, api, logs).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
