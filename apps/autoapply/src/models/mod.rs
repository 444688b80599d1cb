pub mod answers;
pub mod job;

pub use answers::AnswerSet;
pub use job::{ApplicationRecord, JobPosting, QuestionAnswer};
