pub mod features;
pub mod run;
pub mod schema;
pub mod subjects;
