pub mod config;
pub mod metadata;
pub mod mode;
pub mod note;
