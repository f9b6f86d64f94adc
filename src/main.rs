use anyhow::Result;
use clap::Parser;
use colored::*;
use log::*;

use service::config::{load_dotenv, Config};
use service::logging::Logger;
use testing_tools::output::print_test_summary;
use testing_tools::scenarios::{Scenario, Suite};

#[derive(Parser)]
#[command(name = "pet_friends_rs")]
#[command(about = "PetFriends API scenario runner")]
struct Cli {
    /// Scenario to run; all scenarios run in order when omitted
    #[arg(long, value_enum)]
    scenario: Option<Scenario>,

    #[command(flatten)]
    config: Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();
    let cli = Cli::parse();

    Logger::init_logger(&cli.config);

    info!("Running scenarios against {}", cli.config.base_url());
    println!("{}", "=== SETUP PHASE ===".bright_white().bold());
    let suite = Suite::from_config(&cli.config)?;

    let scenarios = match cli.scenario {
        Some(scenario) => vec![scenario],
        None => Scenario::ALL.to_vec(),
    };

    println!("\n{}", "=== TEST PHASE ===".bright_white().bold());
    let results = suite.run_all(&scenarios).await;

    println!("\n{}", "=== RESULTS ===".bright_white().bold());
    print_test_summary(&results);

    let all_passed = results.iter().all(|r| r.passed);

    if all_passed {
        println!("\n{}", "All tests passed! ✓".bright_green().bold());
    } else {
        println!("\n{}", "Some tests failed! ✗".bright_red().bold());
    }

    std::process::exit(if all_passed { 0 } else { 1 });
}
