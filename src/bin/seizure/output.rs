use crate::exit_codes;
use serde::Serialize;
use std::io::Write;

/// Print `value` as JSON to `output_path` (stdout when `None`) and return
/// the exit code for the outcome.
pub fn emit<T: Serialize>(value: &T, compact: bool, output_path: Option<&str>) -> i32 {
    let encoded = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };

    let written = match encoded {
        Ok(json) => deliver(&json, output_path),
        Err(e) => Err(format!("cannot encode result as JSON: {}", e)),
    };

    match written {
        Ok(()) => exit_codes::SUCCESS,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            exit_codes::EXECUTION_ERROR
        }
    }
}

fn deliver(json: &str, output_path: Option<&str>) -> Result<(), String> {
    match output_path {
        Some(path) => {
            std::fs::write(path, format!("{}\n", json)).map_err(|e| format!("{}: {}", path, e))?;
            log::info!("Wrote {} bytes to {}", json.len() + 1, path);
            Ok(())
        }
        None => writeln!(std::io::stdout().lock(), "{}", json)
            .map_err(|e| format!("stdout: {}", e)),
    }
}
