pub mod analyze;
pub mod jobs;
pub mod results;
