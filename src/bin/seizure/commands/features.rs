use crate::cli::FeaturesArgs;
use crate::exit_codes;
use crate::output;
use crate::params;
use seizure_rs::{build_dataset, StoreFactory};
use std::path::Path;

pub fn execute(args: FeaturesArgs) -> i32 {
    let config = match params::resolve_pipeline_config(&args.pipeline) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_codes::for_error(&e);
        }
    };

    let dataset = match StoreFactory::open(Path::new(&args.pipeline.store))
        .and_then(|store| build_dataset(store.as_ref(), &config))
    {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_codes::for_error(&e);
        }
    };

    output::emit(&dataset, args.compact, args.output.as_deref())
}
