use crate::cli::SubjectsArgs;
use crate::exit_codes;
use crate::output;
use seizure_rs::{pipeline, StoreFactory};
use std::path::Path;

pub fn execute(args: SubjectsArgs) -> i32 {
    let recordings = match StoreFactory::open(Path::new(&args.store))
        .and_then(|store| store.load_all(&args.subject_delimiter))
    {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_codes::for_error(&e);
        }
    };

    let summaries = pipeline::summarize(&recordings);

    if args.json {
        return output::emit(&summaries, false, None);
    }

    println!(
        "  {:<16} {:>10} {:>12} {:>16}",
        "Subject", "Arrays", "Samples", "Seizure samples"
    );
    println!("  {}", "-".repeat(58));
    for s in &summaries {
        println!(
            "  {:<16} {:>10} {:>12} {:>16}",
            s.subject, s.recordings, s.samples, s.seizure_samples
        );
    }
    println!();
    println!("{} subject(s), {} array(s)", summaries.len(), recordings.len());

    exit_codes::SUCCESS
}
