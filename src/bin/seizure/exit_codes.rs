use seizure_rs::SeizureError;

pub const SUCCESS: i32 = 0;
pub const EXECUTION_ERROR: i32 = 1;
pub const INPUT_ERROR: i32 = 2;

/// Exit code for a library error: bad input vs. failure while running
pub fn for_error(err: &SeizureError) -> i32 {
    match err {
        SeizureError::InvalidParameter(_)
        | SeizureError::UnknownSubject(_)
        | SeizureError::StoreRead(_)
        | SeizureError::Config(_) => INPUT_ERROR,
        _ => EXECUTION_ERROR,
    }
}
