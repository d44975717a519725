//! Command line and environment configuration for the server.

use std::path::PathBuf;

use clap::Parser;
use peer_registry_core::DEFAULT_USER_DATA_PATH;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_LOG_FILTER: &str =
    "peer_registry_server=debug,peer_registry_core=debug,tower_http=debug";

/// Peer registration service
#[derive(Parser, Debug, Clone)]
#[command(name = "peer-registry-server")]
#[command(version)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, default_value = DEFAULT_BIND_ADDRESS, env = "BIND_ADDRESS")]
    pub bind_address: String,

    /// User data document. Relative paths resolve against the working directory.
    #[arg(long, default_value = DEFAULT_USER_DATA_PATH, env = "USER_DATA_PATH")]
    pub data_file: PathBuf,
}

impl ServerConfig {
    pub fn data_file_in(&self, working_dir: &std::path::Path) -> PathBuf {
        if self.data_file.is_absolute() {
            self.data_file.clone()
        } else {
            working_dir.join(&self.data_file)
        }
    }
}
