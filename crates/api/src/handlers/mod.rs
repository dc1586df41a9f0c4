pub mod admin;
pub mod filter_templates;
pub mod webcams;
