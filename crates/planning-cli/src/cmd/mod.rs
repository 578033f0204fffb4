pub mod config;
pub mod frontmatter;
pub mod milestone;
pub mod progress;
pub mod requirements;
pub mod validate;
pub mod verify;
