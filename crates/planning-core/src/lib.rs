pub mod completeness;
pub mod config;
pub mod consistency;
pub mod error;
pub mod frontmatter;
pub mod inventory;
pub mod io;
pub mod milestone;
pub mod paths;
pub mod plan;
pub mod progress;
pub mod requirements;
pub mod roadmap;
pub mod state;
pub mod validate;

pub use error::{PlanningError, Result};
