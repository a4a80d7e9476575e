// ============================================================================
// Ligne de commande
// ============================================================================
// qtrn chart AAPL -s 2016-12-01 -e 2017-06-20 -i 1d
//
// CONCEPTS RUST :
// 1. clap derive : la structure EST la définition de la CLI
// 2. FromStr : NaiveDate et Interval sont parsés directement par clap
// 3. Conversion explicite ChartArgs -> ChartRequest (pas d'état global)
// ============================================================================

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::error::ChartError;
use crate::models::{ChartRequest, Interval, DEFAULT_END, DEFAULT_START};

/// Message affiché quand plusieurs symboles sont passés à chart
pub const TOO_MANY_SYMBOLS: &str = "\nToo many symbols, only 1 symbol is allowed for charting.\n\n";

/// Stock quotes and charts in the terminal
#[derive(Debug, Parser)]
#[command(name = "qtrn", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print stock chart to the current shell
    #[command(
        visible_alias = "c",
        long_about = "Print stock chart to the current shell using a symbol, time frame, and interval.",
        after_help = "Example:\n  $ qtrn chart AAPL -s 2016-12-01 -e 2017-06-20 -i 1d"
    )]
    Chart(ChartArgs),
}

// Arguments de la sous-commande chart (doc clap : voir Command::Chart)
#[derive(Debug, Args)]
pub struct ChartArgs {
    /// Ticker symbol to chart
    #[arg(value_name = "SYMBOL", required = true)]
    pub symbols: Vec<String>,

    /// Start of the chart's time frame (YYYY-MM-DD)
    #[arg(short, long, value_name = "YYYY-MM-DD", default_value = DEFAULT_START)]
    pub start: NaiveDate,

    /// End of the chart's time frame (YYYY-MM-DD)
    #[arg(short, long, value_name = "YYYY-MM-DD", default_value = DEFAULT_END)]
    pub end: NaiveDate,

    /// Time interval of each chart point (1d | 1wk | 1mo)
    #[arg(short, long, value_name = "1d|1wk|1mo", default_value = "1d")]
    pub interval: Interval,
}

impl ChartArgs {
    /// Convertit les arguments en requête
    ///
    /// # Erreurs
    /// * `ChartError::Usage` - plus d'un symbole, ou symbole vide
    pub fn into_request(self) -> Result<ChartRequest, ChartError> {
        let symbol = match self.symbols.as_slice() {
            [symbol] => symbol,
            _ => return Err(ChartError::Usage(TOO_MANY_SYMBOLS.to_string())),
        };

        ChartRequest::new(symbol, self.start, self.end, self.interval)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
