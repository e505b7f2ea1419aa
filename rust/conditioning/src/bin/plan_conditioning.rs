// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: Produce a conditioning raster and scene description for a floor plan
//!
//! Usage:
//!   plan-conditioning <request.json> [options]

use anyhow::{bail, Context, Result};
use floorplan_lite_conditioning::{build_conditioning, load_request, ConditioningConfig};
use std::env;
use std::fs;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return Ok(());
    }

    let request_path = &args[1];

    // Parse options
    let mut output_path = String::from("conditioning.png");
    let mut description_path: Option<String> = None;
    let mut viewpoint: Option<String> = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--output" => {
                i += 1;
                output_path = option_value(&args, i, "--output")?;
            }
            "--description" => {
                i += 1;
                description_path = Some(option_value(&args, i, "--description")?);
            }
            "--viewpoint" => {
                i += 1;
                viewpoint = Some(option_value(&args, i, "--viewpoint")?);
            }
            other => {
                print_usage();
                bail!("Unknown option: {}", other);
            }
        }
        i += 1;
    }

    let config = ConditioningConfig::from_env();

    let mut request = load_request(request_path)
        .with_context(|| format!("Cannot load request '{}'", request_path))?;
    if viewpoint.is_some() {
        request.viewpoint = viewpoint;
    }

    let output = build_conditioning(&request, &config).context("Conditioning failed")?;
    let artifact = &output.artifact;

    println!("Kind: {}", artifact.kind.as_str());
    println!("Seed: {}", artifact.seed);

    if artifact.is_empty() {
        if let Some(note) = &artifact.note {
            println!("Note: {}", note);
        }
    } else {
        fs::write(&output_path, &artifact.image)
            .with_context(|| format!("Cannot write '{}'", output_path))?;
        println!(
            "Image: {} ({}x{})",
            output_path, artifact.width, artifact.height
        );
    }

    for warning in &output.floor_plan.warnings {
        println!("Warning: {}", warning);
    }

    println!();
    println!("{}", output.scene_description);
    if !output.negative_hints.is_empty() {
        println!();
        println!("Negative: {}", output.negative_hints.join(", "));
    }

    if let Some(path) = description_path {
        fs::write(&path, &output.scene_description)
            .with_context(|| format!("Cannot write '{}'", path))?;
    }

    Ok(())
}

fn option_value(args: &[String], i: usize, name: &str) -> Result<String> {
    match args.get(i) {
        Some(value) => Ok(value.clone()),
        None => bail!("Missing value for {}", name),
    }
}

fn print_usage() {
    println!("Usage: plan-conditioning <request.json> [options]");
    println!();
    println!("The request is a JSON object {{floor_plan, raw_dataset?, viewpoint?}}.");
    println!();
    println!("Options:");
    println!("  --output <path>        Conditioning PNG path (default: conditioning.png)");
    println!("  --description <path>  Also write the scene description to a file");
    println!("  --viewpoint <text>     Override the request's viewpoint");
    println!();
    println!("Environment:");
    println!("  CONDITIONING_WIDTH, CONDITIONING_HEIGHT, LINEART_MARGIN, DEPTH_BLUR_SIGMA,");
    println!("  INFERRED_WALL_THICKNESS, INFERRED_WALL_CONFIDENCE, RUST_LOG");
}
