use crate::infra::parse_weight;
use crate::report::{run_recommend, run_summary};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tn_counsel::config::DatasetConfig;
use tn_counsel::counselling::scoring::DEFAULT_WEIGHT;
use tn_counsel::counselling::Tier;
use tn_counsel::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "tn-counsel",
    about = "Rank engineering colleges, branches and districts for counselling choice filling",
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
    /// Print the choice-filling order for a tier selection and weights
    Recommend(RecommendArgs),
    /// Print the top-tier colleges, branches, districts and departments
    Summary(SummaryArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct DatasetArgs {
    /// Override the directory holding one folder of CSVs per year
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
    /// Override the counselling year to load
    #[arg(long)]
    pub(crate) year: Option<u16>,
}

impl DatasetArgs {
    pub(crate) fn apply(self, config: &mut DatasetConfig) {
        if let Some(data_dir) = self.data_dir {
            config.data_dir = data_dir;
        }
        if let Some(year) = self.year {
            config.year = year;
        }
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) dataset: DatasetArgs,
}

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    #[command(flatten)]
    pub(crate) dataset: DatasetArgs,
    /// College tiers to reward (Top, Best, Next-Best, Rest). Defaults to all.
    #[arg(long = "college-tier", value_delimiter = ',')]
    pub(crate) college_tiers: Vec<Tier>,
    /// Branch tiers to reward. Defaults to all.
    #[arg(long = "branch-tier", value_delimiter = ',')]
    pub(crate) branch_tiers: Vec<Tier>,
    /// District tiers to reward. Defaults to all.
    #[arg(long = "district-tier", value_delimiter = ',')]
    pub(crate) district_tiers: Vec<Tier>,
    /// District importance, 0-100
    #[arg(long, default_value_t = DEFAULT_WEIGHT, value_parser = parse_weight)]
    pub(crate) district_weight: f64,
    /// Department importance, 0-100
    #[arg(long, default_value_t = DEFAULT_WEIGHT, value_parser = parse_weight)]
    pub(crate) department_weight: f64,
    /// Branch importance, 0-100
    #[arg(long, default_value_t = DEFAULT_WEIGHT, value_parser = parse_weight)]
    pub(crate) branch_weight: f64,
    /// College importance, 0-100
    #[arg(long, default_value_t = DEFAULT_WEIGHT, value_parser = parse_weight)]
    pub(crate) college_weight: f64,
    /// Only show rows in this district (repeatable)
    #[arg(long = "district")]
    pub(crate) districts: Vec<String>,
    /// Only show rows in this department (repeatable)
    #[arg(long = "department")]
    pub(crate) departments: Vec<String>,
    /// Only show rows for this branch (repeatable)
    #[arg(long = "branch")]
    pub(crate) branches: Vec<String>,
    /// Only show rows for this college (repeatable)
    #[arg(long = "college")]
    pub(crate) colleges: Vec<String>,
    /// Number of rows to print
    #[arg(long, default_value_t = 25)]
    pub(crate) limit: usize,
    /// Write every visible row to this CSV file
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SummaryArgs {
    #[command(flatten)]
    pub(crate) dataset: DatasetArgs,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Recommend(args) => run_recommend(args),
        Command::Summary(args) => run_summary(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommend_parses_tiers_weights_and_filters() {
        let cli = Cli::try_parse_from([
            "tn-counsel",
            "recommend",
            "--college-tier",
            "top,next-best",
            "--branch-weight",
            "60",
            "--district",
            "Chennai",
            "--district",
            "Salem",
            "--year",
            "2021",
        ])
        .expect("arguments parse");

        let Some(Command::Recommend(args)) = cli.command else {
            panic!("expected recommend command");
        };
        assert_eq!(args.college_tiers, vec![Tier::Top, Tier::NextBest]);
        assert!(args.branch_tiers.is_empty());
        assert_eq!(args.branch_weight, 60.0);
        assert_eq!(args.college_weight, DEFAULT_WEIGHT);
        assert_eq!(args.districts, vec!["Chennai", "Salem"]);
        assert_eq!(args.dataset.year, Some(2021));
    }

    #[test]
    fn out_of_range_weights_and_unknown_tiers_fail_to_parse() {
        assert!(Cli::try_parse_from(["tn-counsel", "recommend", "--college-weight", "101"]).is_err());
        assert!(Cli::try_parse_from(["tn-counsel", "recommend", "--branch-tier", "Elite"]).is_err());
    }

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["tn-counsel"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }

    #[test]
    fn dataset_overrides_replace_configured_values() {
        let mut config = DatasetConfig {
            data_dir: PathBuf::from("Data"),
            year: 2020,
        };
        DatasetArgs {
            data_dir: Some(PathBuf::from("/srv/counselling")),
            year: None,
        }
        .apply(&mut config);

        assert_eq!(config.data_dir, PathBuf::from("/srv/counselling"));
        assert_eq!(config.year, 2020);
    }
}
