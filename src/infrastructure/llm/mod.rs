mod mock_annotator;
mod openai_annotator;
mod token_bucket;

pub use mock_annotator::MockAnnotator;
pub use openai_annotator::OpenAiAnnotator;
pub use token_bucket::TokenBucket;
