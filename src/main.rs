use alertbus::cli::{check, run, send, CheckCommand, Cli, Commands};
use clap::Parser;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Run(args) => run::execute(args).await,
        Commands::Check(CheckCommand::Config(args)) => check::execute_config(&args.config),
        Commands::Check(CheckCommand::Service(args)) => check::execute_service(&args.url).await,
        Commands::Send(args) => send::execute(args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
