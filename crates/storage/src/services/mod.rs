pub mod breaker;
pub mod leasing;
pub mod rating;
pub mod results;
pub mod scheduler;
pub mod stats;
