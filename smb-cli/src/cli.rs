use clap::{Parser, Subcommand};

/// Minimal command-line client exercising the `smb` crate's blocking SMB1
/// connection against a single share.
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Server address, e.g. `192.168.1.10`.
    pub host: std::net::Ipv4Addr,

    /// UNC share path, e.g. `\\SERVER\share`.
    pub unc_path: String,

    #[arg(short, long, default_value = "")]
    pub username: String,
    #[arg(short, long, default_value = "")]
    pub password: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Verifies the server is reachable and speaks the expected dialect.
    Ping,
    /// Lists a directory's immediate contents.
    List {
        /// Path relative to the share root, e.g. `\subdir`. Defaults to the root.
        #[arg(default_value = "\\")]
        path: String,
    },
    /// Reads a file and writes its contents to stdout.
    Cat {
        /// Path relative to the share root.
        path: String,
    },
}
