use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use stock_sim_common::{
    backtest::{DailyResult, InvalidPricePolicy, SimulationSummary},
    export::write_csv,
};
use stock_sim_core::{
    api,
    config::Settings,
    provider::AlphaVantageProvider,
    service::{StockDataRequest, StockDataService},
};

#[derive(Parser)]
#[command(name = "stock-sim")]
#[command(about = "Daily open-to-open profit simulator over historical stock prices")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP relay (default)
    Server,
    /// Run one simulation and print the daily results
    Simulate {
        #[arg(short, long)]
        ticker: String,
        #[arg(short, long)]
        start_date: String,
        #[arg(short, long)]
        end_date: String,
        #[arg(short, long, default_value = "10000")]
        initial_amount: String,
        /// Drop days with non-positive prices instead of failing
        #[arg(long)]
        skip_invalid_prices: bool,
        /// Also write the results as CSV to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::new().context("failed to load settings")?;
    let provider = AlphaVantageProvider::from_settings(&settings.provider)?;
    let service = Arc::new(StockDataService::new(Arc::new(provider)));

    match cli.command.unwrap_or(Commands::Server) {
        Commands::Server => {
            api::serve(&settings.listen_addr(), service, async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!("Failed to listen for shutdown signal: {}", e);
                }
                info!("Shutting down server...");
            })
            .await?;
            info!("Server shutdown complete");
        }

        Commands::Simulate {
            ticker,
            start_date,
            end_date,
            initial_amount,
            skip_invalid_prices,
            output,
        } => {
            let mut request =
                StockDataRequest::parse(&ticker, &start_date, &end_date, &initial_amount)?;
            if skip_invalid_prices {
                request = request.with_invalid_price_policy(InvalidPricePolicy::Skip);
            }

            let results = service.run(&request).await?;
            if results.is_empty() {
                info!(
                    "No trading days for {} between {} and {}",
                    request.ticker, request.params.start_date, request.params.end_date
                );
            }

            print_results(&results);
            print_summary(&SimulationSummary::from_results(
                request.params.initial_amount,
                &results,
            ));

            if let Some(path) = output {
                let file = File::create(&path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                write_csv(BufWriter::new(file), &results)?;
                info!("Wrote {} rows to {}", results.len(), path.display());
            }
        }
    }

    Ok(())
}

fn print_results(results: &[DailyResult]) {
    println!(
        "\n{:<12} {:>10} {:>10} {:>8} {:>12} {:>12} {:>10} {:>12} {:>12}",
        "Date", "Open", "Close", "Shares", "Investment", "End Value", "Profit", "Cash", "Total"
    );
    for day in results {
        println!(
            "{:<12} {:>10} {:>10} {:>8} {:>12} {:>12} {:>10} {:>12} {:>12}",
            day.date.to_string(),
            day.open_price,
            day.close_price,
            day.shares,
            day.investment,
            day.end_value,
            day.daily_profit,
            day.available_funds,
            day.total_value
        );
    }
}

fn print_summary(summary: &SimulationSummary) {
    println!("\nSimulation Results:");
    println!("Trading Days: {}", summary.trading_days);
    println!("Initial Amount: {}", summary.initial_amount);
    println!("Final Value: {}", summary.final_value);
    println!("Total Profit: {}", summary.total_profit);
    println!("Total Return: {}%", summary.return_percentage);
    println!(
        "Winning/Losing/Flat Days: {}/{}/{}",
        summary.winning_days, summary.losing_days, summary.flat_days
    );
    if let (Some(best), Some(worst)) = (summary.best_day, summary.worst_day) {
        println!("Best Day: {}  Worst Day: {}", best, worst);
    }
    println!("Max Drawdown: {}%", summary.max_drawdown);
}
