//! Summarization collaborators

pub mod groq;
pub mod remote;

pub use groq::GroqSummarizer;
pub use remote::RemoteSummarizer;
