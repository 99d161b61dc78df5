// Draft Generation
// Implements: payload model, declarative schema, prompt construction, transcript
// retrieval, the generation pipeline, and snapshot edits.
// All completion calls go through llm_client; nothing here talks to the API directly.

pub mod edit;
pub mod generator;
pub mod handlers;
pub mod model;
pub mod prompts;
pub mod schema;
pub mod transcript;
