mod job;
mod job_id;
mod job_status;
mod rule;
mod section;
mod storage_path;
mod term;

pub use job::Job;
pub use job_id::JobId;
pub use job_status::JobStatus;
pub use rule::{ExtractedRule, RuleCategory, TextSpan};
pub use section::{Section, SectionClass};
pub use storage_path::StoragePath;
pub use term::ExtractedTerm;
