use crate::commands::{run_lines, run_rank, run_rent, LinesArgs, RankArgs, RentArgs};
use crate::session::{run_watch, WatchArgs};
use clap::{Parser, Subcommand};
use hikkoshi_lens::config::AppConfig;
use hikkoshi_lens::error::AppError;
use hikkoshi_lens::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "hikkoshi-lens-ranker",
    about = "Score, rank, and group candidate stations for a move",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank stations best first
    Rank(RankArgs),
    /// Group ranked stations by operator and line
    Lines(LinesArgs),
    /// Show the rent each station costs after a housing subsidy
    Rent(RentArgs),
    /// Re-rank interactively as weight updates arrive on stdin
    Watch(WatchArgs),
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    tracing::debug!(environment = ?config.environment, "configuration loaded");

    match cli.command {
        Command::Rank(args) => run_rank(args, &config),
        Command::Lines(args) => run_lines(args, &config),
        Command::Rent(args) => run_rent(args, &config),
        Command::Watch(args) => run_watch(args, &config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use hikkoshi_lens::ranking::{FactorKind, SubsidyCondition};

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_rank_flags() {
        let cli = Cli::try_parse_from([
            "hikkoshi-lens-ranker",
            "rank",
            "--stations",
            "stations.json",
            "--weights",
            "access=40,rent=60",
            "--origin",
            "35.68,139.76",
            "--top",
            "5",
            "--json",
        ])
        .expect("rank parses");

        let Command::Rank(args) = cli.command else {
            panic!("expected rank command");
        };
        assert_eq!(args.top, Some(5));
        assert!(args.output.json);
        assert_eq!(
            args.weights.raw().expect("weights parse").get(FactorKind::Rent),
            60.0
        );
        assert!(args.source.origin.is_some());
    }

    #[test]
    fn negative_weights_fail_when_read() {
        let cli = Cli::try_parse_from([
            "hikkoshi-lens-ranker",
            "lines",
            "--stations",
            "stations.json",
            "--weights",
            "access=-1",
        ])
        .expect("lines parses");

        let Command::Lines(args) = cli.command else {
            panic!("expected lines command");
        };
        assert!(args.weights.raw().is_err());
    }

    #[test]
    fn parses_rent_condition() {
        let cli = Cli::try_parse_from([
            "hikkoshi-lens-ranker",
            "rent",
            "--stations",
            "stations.csv",
            "--amount",
            "2.5",
            "--condition",
            "stops",
            "--value",
            "2",
        ])
        .expect("rent parses");

        let Command::Rent(args) = cli.command else {
            panic!("expected rent command");
        };
        let settings = args.settings();
        assert_eq!(settings.condition_type, SubsidyCondition::Stops);
        assert_eq!(settings.amount, 2.5);
        assert_eq!(settings.condition_value, 2.0);
    }
}
