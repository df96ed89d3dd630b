use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_processor::{DataProcessor, SnapshotPayload};
use server::HybridRecommender;
use std::path::PathBuf;
use std::time::Instant;

/// ShopRecs - Hybrid Product Recommendation Engine
#[derive(Parser)]
#[command(name = "shop-recs")]
#[command(about = "Product recommendations from a snapshot payload", long_about = None)]
struct Cli {
    /// Path to a snapshot payload JSON file
    #[arg(short, long, default_value = "data/snapshot.json")]
    snapshot: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get product recommendations for a user
    Recommend {
        /// User id to get recommendations for
        #[arg(long)]
        user_id: String,

        /// Number of recommendations to return
        #[arg(long, default_value = "3")]
        limit: usize,
    },

    /// Show a user's profile and purchase history
    User {
        /// User id to display
        #[arg(long)]
        user_id: String,
    },

    /// Benchmark full train+recommend cycles
    Benchmark {
        /// Number of query cycles to run
        #[arg(long, default_value = "20")]
        requests: usize,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Load the snapshot payload
    println!("Loading snapshot from {}...", cli.snapshot.display());
    let start = Instant::now();
    let bytes = std::fs::read(&cli.snapshot).context("Failed to read snapshot file")?;
    let payload: SnapshotPayload =
        serde_json::from_slice(&bytes).context("Failed to decode snapshot payload")?;
    println!("{} Loaded snapshot in {:?}", "✓".green(), start.elapsed());

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend { user_id, limit } => handle_recommend(&payload, &user_id, limit)?,
        Commands::User { user_id } => handle_user(&payload, &user_id)?,
        Commands::Benchmark { requests } => handle_benchmark(&payload, requests)?,
    }

    Ok(())
}

/// Handle the 'recommend' command
fn handle_recommend(payload: &SnapshotPayload, user_id: &str, limit: usize) -> Result<()> {
    let mut recommender = HybridRecommender::new();
    recommender.train(payload)?;

    let recommendations = recommender.recommend(user_id, limit);

    println!(
        "{}",
        format!("Recommendations for {}:", user_id).bold().blue()
    );
    if recommendations.is_empty() {
        println!("  (none)");
        return Ok(());
    }
    for (i, variant_id) in recommendations.iter().enumerate() {
        // Enrich with product metadata where the catalog has it
        match recommender.processor().get_product_by_variant(variant_id) {
            Some(product) => println!(
                "{}. {} - {} [{} / {}]",
                (i + 1).to_string().green(),
                variant_id,
                product.name,
                product.category,
                product.brand
            ),
            None => println!("{}. {}", (i + 1).to_string().green(), variant_id),
        }
    }
    Ok(())
}

/// Handle the 'user' command
fn handle_user(payload: &SnapshotPayload, user_id: &str) -> Result<()> {
    let mut processor = DataProcessor::new();
    processor.process(payload)?;

    let user = processor
        .get_user(user_id)
        .ok_or_else(|| anyhow!("User {} not found", user_id))?;

    print!("{}", format!("User ID: {}\n", user_id).bold().blue());
    print!(
        "{}Age: {}\n",
        "• ".green(),
        user.age.map(|a| a.to_string()).unwrap_or("unknown".to_string())
    );
    print!(
        "{}Gender flag: {}\n",
        "• ".green(),
        user.gender.map(|g| g.to_string()).unwrap_or("unknown".to_string())
    );

    let order_count = processor
        .orders()
        .iter()
        .filter(|o| o.client_id == user_id)
        .count();
    let purchased = processor.purchased_variants(user_id);
    print!("{}Orders: {}\n", "• ".cyan(), order_count);
    print!("{}Distinct variants: {}\n", "• ".cyan(), purchased.len());

    print!("Purchased products:\n");
    for variant_id in &purchased {
        match processor.get_product_by_variant(variant_id) {
            Some(product) => print!(
                "  - {} ({} / {})\n",
                product.name, product.category, product.brand
            ),
            None => print!("  - {} (not in catalog)\n", variant_id),
        }
    }
    Ok(())
}

/// Handle the 'benchmark' command
fn handle_benchmark(payload: &SnapshotPayload, requests: usize) -> Result<()> {
    // Collect the user ids once so each cycle queries a real user
    let mut processor = DataProcessor::new();
    processor.process(payload)?;
    let user_ids: Vec<String> = processor.users().iter().map(|u| u.id.clone()).collect();
    if user_ids.is_empty() {
        return Err(anyhow!("Snapshot has no users to benchmark against"));
    }

    // Every cycle pays the full retrain cost, matching the serving path
    let mut timings = Vec::with_capacity(requests);
    for _ in 0..requests {
        let user_id = &user_ids[rand::random::<u32>() as usize % user_ids.len()];
        let start = Instant::now();

        let mut recommender = HybridRecommender::new();
        recommender.train(payload)?;
        let recommendations = recommender.recommend(user_id, 3);

        timings.push(start.elapsed());
        std::hint::black_box(recommendations);
    }

    let total_time: std::time::Duration = timings.iter().sum();
    let avg_latency = total_time / (timings.len() as u32);
    timings.sort();
    let p50 = timings[timings.len() / 2];
    let p95 = timings[(timings.len() as f32 * 0.95) as usize];
    let p99 = timings[(timings.len() as f32 * 0.99) as usize];
    let throughput = requests as f32 / total_time.as_secs_f32();

    println!("Benchmark results:");
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", p50);
    println!("P95 latency: {:?}", p95);
    println!("P99 latency: {:?}", p99);
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}
