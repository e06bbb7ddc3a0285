use crate::demo::{run_demo, run_listing_search, DemoArgs, ListingSearchArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use tu_brete::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Tu Brete San Mateo",
    about = "Run the San Mateo job board service or explore listings from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Work with exported listing snapshots
    Listings {
        #[command(subcommand)]
        command: ListingsCommand,
    },
    /// Walk through publishing, browsing and reviewing applications in memory
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ListingsCommand {
    /// Filter a CSV export of the jobs table with the browse criteria
    Search(ListingSearchArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Listings {
            command: ListingsCommand::Search(args),
        } => run_listing_search(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_flags_parse() {
        let cli = Cli::try_parse_from([
            "tu-brete-api",
            "listings",
            "search",
            "--csv",
            "data/listings.csv",
            "--category",
            "Turismo",
            "--remote",
            "remote",
            "--salary-min",
            "250000",
        ])
        .expect("flags parse");

        let Some(Command::Listings {
            command: ListingsCommand::Search(args),
        }) = cli.command
        else {
            panic!("expected listings search");
        };
        assert_eq!(args.category.as_deref(), Some("Turismo"));
        assert_eq!(args.salary_min.as_deref(), Some("250000"));
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["tu-brete-api"]).expect("no args parse");
        assert!(cli.command.is_none());
    }
}
