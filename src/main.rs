//! CycleScope CLI: bike-sharing rental analytics over a selected date range
//!
//! This is the main entrypoint that orchestrates data loading, aggregation,
//! clustering, and chart rendering.

use anyhow::{Context, Result};
use clap::Parser;
use cyclescope::{run_pipeline, viz, Args, RentalTables};
use std::time::Instant;

fn main() -> Result<()> {
    let args = Args::parse();

    if args.verbose {
        println!("CycleScope - Bike-Sharing Rental Analytics");
        println!("==========================================\n");
    }

    let start_time = Instant::now();

    // Step 1: Load the two source tables
    if args.verbose {
        println!("Step 1: Loading data");
        println!("  Daily table:  {}", args.daily);
        println!("  Hourly table: {}", args.hourly);
    }

    let load_start = Instant::now();
    let tables = RentalTables::load(&args.daily, &args.hourly)?;
    let load_time = load_start.elapsed();

    println!(
        "✓ Data loaded: {} days, {} hourly rows",
        tables.daily.len(),
        tables.hourly.len()
    );
    if args.verbose {
        println!("  Loading time: {:.2}s", load_time.as_secs_f64());
    }

    // Step 2: Resolve the user selection and run the pipeline
    let span = tables.date_span().context("daily table has no rows")?;
    let range = args.date_range(span)?;
    let features = args.feature_pair();

    if args.verbose {
        println!("\nStep 2: Running analysis pipeline");
        println!("  Range:    {} to {}", range.start(), range.end());
        println!(
            "  Features: {} vs {}",
            features.x.label(),
            features.y.label()
        );
    }

    let pipeline_start = Instant::now();
    let data = run_pipeline(&tables, range, features, &args.pipeline_options())?;
    let pipeline_time = pipeline_start.elapsed();

    println!("✓ Pipeline complete: {} days in range", data.daily.len());
    if args.verbose {
        println!("  Pipeline time: {:.2}s", pipeline_time.as_secs_f64());
    }

    viz::print_summary(&data);

    // Step 3: Render the chart sequence
    if args.verbose {
        println!("\nStep 3: Rendering charts");
        println!("  Output base: {}", args.output);
    }

    let render_start = Instant::now();
    viz::generate_dashboard_report(&data, &args.output)?;
    let render_time = render_start.elapsed();

    if args.verbose {
        println!("  Rendering time: {:.2}s", render_time.as_secs_f64());
    }

    println!(
        "\n✓ Done in {:.2}s, charts written next to {}",
        start_time.elapsed().as_secs_f64(),
        args.output
    );

    Ok(())
}
