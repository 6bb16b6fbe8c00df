use clap::Parser;
use dotenv::dotenv;

mod commands;
mod output;

use commands::Cli;

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::debug!("Running {:?}", cli.command);

    match commands::run(cli).await {
        Ok(text) => println!("{}", text),
        Err(e) => {
            log::error!("{:#}", e);
            std::process::exit(1);
        }
    }
}
