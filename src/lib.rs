pub mod assembler;
pub mod config;
pub mod deploy;
pub mod error;
pub mod models;
pub mod prompt;
pub mod server;
pub mod service;
pub mod transport;
pub mod validation;

pub use crate::error::{Result, SiteGenError};
pub use crate::models::{DeploymentRecord, GeneratedDocument};
pub use crate::service::WebsiteService;
