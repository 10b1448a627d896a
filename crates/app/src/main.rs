// CLI modules
mod cli;

use clap::{Parser, Subcommand};
use cli::{args::Args, op::Op, Init, Mint, Transfer, Version};

command_enum! {
    (Init, Init),
    (Mint, Mint),
    (Transfer, Transfer),
    (Version, Version),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Build context - config directory (or defaults) plus QUBE_* overrides
    let ctx = match cli::op::OpContext::new(args.config_path) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let guards = qube::init_logging(&ctx.config);

    let result = args.command.execute(&ctx).await;
    guards.shutdown().await;

    match result {
        Ok(output) => {
            println!("{}", output);
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
