mod export;
mod health;
mod parse_sync;
mod results;
mod submit;
mod trigger_parse;

pub use export::export_rules_handler;
pub use health::health_handler;
pub use parse_sync::parse_sync_handler;
pub use results::{job_results_handler, RuleResponse};
pub use submit::submit_job_handler;
pub use trigger_parse::trigger_parse_handler;
