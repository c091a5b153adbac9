// Course recommendations: static catalog, role/skill lookup, ranked learning
// plans and their CSV/JSON exports.

pub mod catalog;
pub mod engine;
pub mod export;
pub mod handlers;
