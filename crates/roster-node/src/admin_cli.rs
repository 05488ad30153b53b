//! roster-admin CLI tool
//!
//! Talks to a running roster-node over its admin socket.
//!
//! Usage:
//!   roster-admin ping
//!   roster-admin stats
//!   roster-admin list-members
//!   roster-admin eligible <selector> <item_id>
//!   roster-admin reload

use roster_node::admin_socket::{default_socket_path, AdminCommand, AdminResponse};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;

fn print_usage() {
    eprintln!("roster-admin - Inspect a running roster node");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  roster-admin ping                         Check if daemon is running");
    eprintln!("  roster-admin stats                        Show roster counts");
    eprintln!("  roster-admin list-members                 List members with attendance");
    eprintln!("  roster-admin eligible <selector> <item>   List eligible members");
    eprintln!("                                            (selector: category id, ring, archboss)");
    eprintln!("  roster-admin reload                       Re-read the roster document");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  ROSTER_SOCKET  Path to admin socket (default: ./roster-data/admin.sock)");
}

fn get_socket_path() -> PathBuf {
    std::env::var("ROSTER_SOCKET")
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_socket_path())
}

fn send_command(cmd: AdminCommand) -> Result<AdminResponse, String> {
    let socket_path = get_socket_path();

    let mut stream = UnixStream::connect(&socket_path).map_err(|e| {
        format!(
            "Failed to connect to roster-node at {:?}: {}\n\
             Is the roster-node running?",
            socket_path, e
        )
    })?;

    // Send command
    let cmd_json = serde_json::to_string(&cmd).map_err(|e| e.to_string())?;
    writeln!(stream, "{}", cmd_json).map_err(|e| e.to_string())?;

    // Read response
    let mut reader = BufReader::new(&stream);
    let mut response_line = String::new();
    reader
        .read_line(&mut response_line)
        .map_err(|e| e.to_string())?;

    serde_json::from_str(&response_line).map_err(|e| format!("Invalid response: {}", e))
}

fn parse_args(args: &[String]) -> Result<AdminCommand, String> {
    let command = args.get(1).ok_or("missing command")?;
    match command.as_str() {
        "ping" => Ok(AdminCommand::Ping),
        "stats" => Ok(AdminCommand::Stats),
        "list-members" => Ok(AdminCommand::ListMembers),
        "reload" => Ok(AdminCommand::Reload),
        "eligible" => match (args.get(2), args.get(3)) {
            (Some(selector), Some(item_id)) => Ok(AdminCommand::Eligible {
                selector: selector.clone(),
                item_id: item_id.clone(),
            }),
            _ => Err("eligible requires <selector> and <item_id> arguments".to_string()),
        },
        other => Err(format!("Unknown command: {}", other)),
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if matches!(args.get(1).map(String::as_str), Some("-h" | "--help" | "help")) {
        print_usage();
        std::process::exit(0);
    }

    let cmd = match parse_args(&args) {
        Ok(cmd) => cmd,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    match send_command(cmd) {
        Ok(response) => match response {
            AdminResponse::Ok { message } => {
                println!("{}", message);
            }
            AdminResponse::Error { error } => {
                eprintln!("Error: {}", error);
                std::process::exit(1);
            }
            AdminResponse::List { items } => {
                if items.is_empty() {
                    println!("(none)");
                } else {
                    for item in items {
                        println!("{}", item);
                    }
                }
            }
            AdminResponse::Pong => {
                println!("pong - roster-node is running");
            }
        },
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
