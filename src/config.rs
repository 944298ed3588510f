//! Runtime configuration: command-line flags with environment fallbacks.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "todo-api", version, about = "JSON todo service backed by a flat file")]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// JSON file holding the todo list. Created on first write.
    #[arg(long, env = "TODOS_FILE", default_value = "todos.json")]
    pub data_file: PathBuf,

    /// Default log filter; `RUST_LOG` takes precedence.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cfg = Config::try_parse_from([
            "todo-api",
            "--host", "127.0.0.1",
            "--port", "8080",
            "--data-file", "/tmp/todos.json",
        ])
        .unwrap();
        assert_eq!(cfg.bind_addr(), "127.0.0.1:8080".parse().unwrap());
        assert_eq!(cfg.data_file, PathBuf::from("/tmp/todos.json"));
    }

    #[test]
    fn rejects_bad_port() {
        assert!(Config::try_parse_from(["todo-api", "--port", "99999"]).is_err());
    }
}
