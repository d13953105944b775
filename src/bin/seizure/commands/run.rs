use crate::cli::RunArgs;
use crate::exit_codes;
use crate::output;
use crate::params;
use seizure_rs::{pipeline, StoreFactory};
use std::path::Path;
use std::time::Instant;

pub fn execute(args: RunArgs) -> i32 {
    let config = match params::resolve_run_config(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_codes::for_error(&e);
        }
    };

    if config.test_subject.is_none() {
        eprintln!("Error: --test-subject is required (or set test_subject in the config file)");
        return exit_codes::INPUT_ERROR;
    }

    let store = match StoreFactory::open(Path::new(&args.pipeline.store)) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_codes::for_error(&e);
        }
    };

    let start_time = Instant::now();
    let report = pipeline::run(store.as_ref(), &config);
    drop(store);

    let report = match report {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_codes::for_error(&e);
        }
    };

    log::info!(
        "Evaluation finished in {:.2}s\n{}",
        start_time.elapsed().as_secs_f64(),
        report.metrics.confusion_matrix.display()
    );

    output::emit(&report, args.compact, args.output.as_deref())
}
