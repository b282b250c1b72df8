use clap::Parser;
use std::process::ExitCode;

mod action;

#[derive(Parser)]
#[clap(author, version, about)]
struct Args {
    /// Logging directive, written on stderr.
    #[clap(long, env = "LOG", default_value = "sparkpost_provider=info")]
    log: String,
    /// Disables colors in the logs.
    #[clap(long)]
    no_color: bool,
    #[clap(subcommand)]
    action: action::Action,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(err) = sparkpost_provider::init_logs(&args.log, !args.no_color) {
        eprintln!("unable to initialize logs: {err:?}");
    }
    args.action.execute().await
}
