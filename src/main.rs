use anyhow::Result;
use clap::Parser;
use devscout::cli::Args;
use devscout::types::{CompanyInfo, ResearchState, TriState, UNKNOWN};
use devscout::launch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let default_filter = if args.verbose { "devscout=debug" } else { "devscout=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let query = args.query.clone();
    let json = args.json;
    let config = args.into_config()?;

    let state = launch(&config, &query).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print_report(&state);
    }

    Ok(())
}

fn print_report(state: &ResearchState) {
    println!("\n📊 Results for: {}", state.query());
    println!("{}", "=".repeat(60));

    for (i, company) in state.company_info.iter().enumerate() {
        print_company(i + 1, company);
    }

    if !state.analysis.is_empty() {
        println!("Developer Recommendations:");
        println!("{}", "-".repeat(40));
        println!("{}", state.analysis);
    }
}

fn print_company(index: usize, company: &CompanyInfo) {
    println!("\n{}. 🏢 {}", index, company.name);
    println!("   🌐 Website: {}", company.website);
    println!("   💰 Pricing: {}", company.pricing_model);
    println!("   📖 Open Source: {}", company.is_open_source);

    if !company.tech_stack.is_empty() {
        println!("   🛠️  Tech Stack: {}", limited(&company.tech_stack, 5));
    }
    if !company.language_support.is_empty() {
        println!("   💻 Language Support: {}", limited(&company.language_support, 5));
    }
    match company.api_available {
        TriState::Yes => println!("   🔌 API: ✅ Available"),
        TriState::No => println!("   🔌 API: ❌ Not Available"),
        TriState::Unknown => {}
    }
    if !company.integration_capabilities.is_empty() {
        println!("   🔗 Integrations: {}", limited(&company.integration_capabilities, 4));
    }
    if !company.description.is_empty() && company.description != UNKNOWN {
        println!("   📝 Description: {}", company.description);
    }
    println!();
}

fn limited(items: &[String], max: usize) -> String {
    items.iter().take(max).cloned().collect::<Vec<_>>().join(", ")
}
