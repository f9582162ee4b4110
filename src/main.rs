use anyhow::Result;
use casedesk::app::App;
use casedesk::config::Config;
use clap::{App as Cli, Arg};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Cli::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("DIR")
                .help("Directory holding config.yml (default: ~/.config/casedesk)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("base-url")
                .short("u")
                .long("base-url")
                .value_name("URL")
                .help("Backend base URL for this session")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("export-dir")
                .short("o")
                .long("export-dir")
                .value_name("DIR")
                .help("Directory exports are written to for this session")
                .takes_value(true),
        )
        .get_matches();

    let mut config = Config::new();
    config.load(matches.value_of("config"))?;
    if let Some(base_url) = matches.value_of("base-url") {
        config.base_url = base_url.to_string();
    }
    if let Some(export_dir) = matches.value_of("export-dir") {
        config.export_dir = PathBuf::from(export_dir);
    }

    App::start(config).await?;
    Ok(())
}
