use crate::cli::SchemaArgs;
use crate::exit_codes;
use crate::output;
use seizure_rs::{FeatureSchema, PipelineConfig};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct Column {
    index: usize,
    name: String,
}

pub fn execute(args: SchemaArgs) -> i32 {
    if args.channels == 0 {
        eprintln!("Error: --channels must be at least 1");
        return exit_codes::INPUT_ERROR;
    }

    let config = match &args.config {
        Some(path) => match PipelineConfig::from_json_file(Path::new(path)) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error: {}", e);
                return exit_codes::for_error(&e);
            }
        },
        None => PipelineConfig::default(),
    };

    let schema = FeatureSchema::new(&config.bands, args.channels);
    let columns: Vec<Column> = schema
        .names()
        .iter()
        .enumerate()
        .map(|(index, name)| Column {
            index,
            name: name.clone(),
        })
        .collect();

    if args.json {
        return output::emit(&columns, false, None);
    }

    println!("Feature columns ({}):\n", columns.len());
    for c in &columns {
        println!("  {:>3}  {}", c.index, c.name);
    }
    println!();
    println!("Bands:");
    for band in &config.bands {
        println!("  {:<8} [{}, {}) Hz", band.name, band.lower, band.upper);
    }

    exit_codes::SUCCESS
}
