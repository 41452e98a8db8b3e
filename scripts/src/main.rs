use bulk_sender_scripts::{
    cli::Cli,
    utils::{exit_with, init_tracing},
};
use clap::Parser;
use dotenv::dotenv;

#[tokio::main]
async fn main() {
    // Load .env file
    dotenv().ok();

    let Cli { command } = Cli::parse();

    init_tracing();

    if let Err(err) = command.run().await {
        exit_with(err);
    }
}
