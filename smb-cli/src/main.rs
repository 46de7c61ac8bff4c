mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use smb::{Connection, FileInfo, TcpTransport};

fn main() -> std::process::ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        return std::process::ExitCode::FAILURE;
    }
    std::process::ExitCode::SUCCESS
}

fn run(cli: &Cli) -> smb::Result<()> {
    let mut conn = Connection::new(TcpTransport::new());
    conn.connect(cli.host, &cli.unc_path, &cli.username, &cli.password)?;
    log::info!("connected to {} as {:?}", cli.unc_path, cli.username);

    match &cli.command {
        Commands::Ping => {
            conn.test_connection()?;
            println!("ok");
        }
        Commands::List { path } => {
            let dir = path_to_file_info(path);
            for entry in conn.list_directory(&dir)? {
                let marker = if entry.is_directory { "/" } else { "" };
                println!("{}{marker}\t{}", entry.name(), entry.size);
            }
        }
        Commands::Cat { path } => {
            let file = path_to_file_info(path);
            let mut offset = 0u32;
            loop {
                let chunk = conn.read_file(&file, offset, 8192)?;
                if chunk.is_empty() {
                    break;
                }
                use std::io::Write;
                std::io::stdout().write_all(&chunk).ok();
                offset += chunk.len() as u32;
            }
        }
    }

    conn.disconnect();
    Ok(())
}

/// Builds a [`FileInfo`] for a `\`-separated path relative to the share
/// root, e.g. `\sub\file.txt`. The CLI only ever needs the path, not the
/// metadata a directory listing would otherwise supply.
fn path_to_file_info(path: &str) -> FileInfo {
    let mut info = FileInfo::root();
    for component in path.split('\\').filter(|c| !c.is_empty()) {
        info = info.child(component, true, 0);
    }
    info
}
