//! s3menu-core - Core library for the s3menu CLI
//!
//! This library provides the generic text menu engine, the object-storage
//! abstraction used by the menu actions and its S3 implementation, plus
//! configuration management.

pub mod client;
pub mod config;
pub mod error;
pub mod menu;
pub mod naming;
pub mod storage;

// Re-export commonly used types
pub use client::S3Store;
pub use config::{get_config_path, load_config, load_config_from, save_config_to, validate_config};
pub use config::{ConfigFile, LoggingConfig, MenuConfig, StorageConfig};
pub use error::{Error, Result};
pub use menu::{Menu, MenuOption, Selection, Terminal};
pub use naming::{bucket_name_from, validate_bucket_name};
pub use storage::ObjectStore;
