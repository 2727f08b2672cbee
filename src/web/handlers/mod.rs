pub mod job_handlers;
pub mod match_handlers;
pub mod system_handlers;

pub use job_handlers::*;
pub use match_handlers::*;
pub use system_handlers::*;
