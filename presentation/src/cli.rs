//! Command-line interface definition

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use tandem_domain::Strategy;

/// Two-party divergent/convergent ideation sessions over LLM backends
#[derive(Parser, Debug)]
#[command(name = "tandem", version, about)]
pub struct Cli {
    /// The planning task or brainstorming topic
    #[arg(long)]
    pub topic: String,

    /// Turn allocation strategy
    #[arg(long, value_enum, default_value_t = StrategyArg::DivergentConvergent)]
    pub strategy: StrategyArg,

    /// Number of turns in the divergent phase
    #[arg(long)]
    pub divergent_turns: Option<u32>,

    /// Number of turns in the convergent phase
    #[arg(long)]
    pub convergent_turns: Option<u32>,

    /// Turns shown verbatim before folding into the cumulative summary
    #[arg(long)]
    pub chunk_threshold: Option<usize>,

    /// Override the configured generation model
    #[arg(long)]
    pub model: Option<String>,

    /// Override the configured API base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Explicit config file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Export the session to this path (.json, .md)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Pair the most similar personas instead of the most dissimilar
    #[arg(long)]
    pub similar: bool,

    /// Generate a comprehensive design document after the session
    #[arg(long)]
    pub generate_report: bool,

    /// Suppress progress output
    #[arg(long)]
    pub quiet: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// CLI-facing strategy names
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyArg {
    /// All turns isolated
    Divergent,
    /// All turns shared
    Convergent,
    /// Isolated ideation, then shared synthesis
    #[value(name = "divergent-convergent")]
    DivergentConvergent,
}

impl StrategyArg {
    /// Build the domain strategy from resolved turn counts
    pub fn to_strategy(self, divergent_turns: u32, convergent_turns: u32) -> Strategy {
        match self {
            StrategyArg::Divergent => Strategy::DivergentOnly { divergent_turns },
            StrategyArg::Convergent => Strategy::ConvergentOnly { convergent_turns },
            StrategyArg::DivergentConvergent => Strategy::DivergentThenConvergent {
                divergent_turns,
                convergent_turns,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::parse_from(["tandem", "--topic", "Plan a migration"]);
        assert_eq!(cli.topic, "Plan a migration");
        assert_eq!(cli.strategy, StrategyArg::DivergentConvergent);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_parse_strategy_names() {
        let cli = Cli::parse_from(["tandem", "--topic", "t", "--strategy", "divergent"]);
        assert_eq!(cli.strategy, StrategyArg::Divergent);
        let cli = Cli::parse_from([
            "tandem",
            "--topic",
            "t",
            "--strategy",
            "divergent-convergent",
        ]);
        assert_eq!(cli.strategy, StrategyArg::DivergentConvergent);
    }

    #[test]
    fn test_to_strategy_respects_counts() {
        let strategy = StrategyArg::Divergent.to_strategy(7, 99);
        assert_eq!(strategy.total_turns(), 7);
        let strategy = StrategyArg::DivergentConvergent.to_strategy(3, 4);
        assert_eq!(strategy.total_turns(), 7);
    }

    #[test]
    fn test_verbosity_count() {
        let cli = Cli::parse_from(["tandem", "--topic", "t", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }
}
