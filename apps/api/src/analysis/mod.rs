pub mod ats;
pub mod experience;
pub mod handlers;
pub mod matching;
pub mod quality;
pub mod report;
pub mod vocabulary;
