//! slotboard-admin CLI tool
//!
//! Configures a running slotboard server over its admin socket.
//!
//! Usage:
//!   slotboard-admin configure <quotas>
//!   slotboard-admin set-slot-kind <index> <kind>
//!   slotboard-admin set-grid <matrix>
//!   slotboard-admin get-grid
//!   slotboard-admin slot-details
//!   slotboard-admin reset
//!   slotboard-admin ping

use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;

use slotboard_server::admin_socket::default_socket_path;
use slotboard_server::{AdminCommand, AdminResponse};

fn print_usage() {
    eprintln!("slotboard-admin - Configure a running slotboard server");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  slotboard-admin configure <quotas>          Set quotas, e.g. r1=5,r2=2");
    eprintln!("  slotboard-admin set-slot-kind <index> <kind> Set one slot's kind (20, 40 or 60)");
    eprintln!("  slotboard-admin set-grid <matrix>           Replace the grid, rows split by ';'");
    eprintln!("  slotboard-admin get-grid                    Print the kind matrix");
    eprintln!("  slotboard-admin slot-details                List every slot");
    eprintln!("  slotboard-admin reset                       Empty the board");
    eprintln!("  slotboard-admin ping                        Check if the server is running");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  SLOTBOARD_ADMIN_SOCKET  Path to admin socket (default: ./slotboard.sock)");
}

fn send_command(cmd: &AdminCommand) -> Result<AdminResponse, String> {
    let socket_path = default_socket_path();

    let mut stream = UnixStream::connect(&socket_path).map_err(|e| {
        format!(
            "Failed to connect to slotboard-server at {:?}: {}\n\
             Is the server running?",
            socket_path, e
        )
    })?;

    let cmd_json = serde_json::to_string(cmd).map_err(|e| e.to_string())?;
    writeln!(stream, "{}", cmd_json).map_err(|e| e.to_string())?;

    let mut reader = BufReader::new(&stream);
    let mut response_line = String::new();
    reader
        .read_line(&mut response_line)
        .map_err(|e| e.to_string())?;

    serde_json::from_str(&response_line).map_err(|e| format!("Invalid response: {}", e))
}

fn parse_command(args: &[String]) -> Result<AdminCommand, String> {
    let arg = |i: usize, name: &str| {
        args.get(i)
            .cloned()
            .ok_or_else(|| format!("{} requires a {} argument", args[0], name))
    };

    match args[0].as_str() {
        "configure" => {
            let quotas = arg(1, "quotas")?.parse().map_err(|e| format!("{}", e))?;
            Ok(AdminCommand::Configure { quotas })
        }
        "set-slot-kind" => {
            let index = arg(1, "index")?
                .parse()
                .map_err(|e| format!("bad index: {}", e))?;
            let kind = arg(2, "kind")?.parse().map_err(|e| format!("{}", e))?;
            Ok(AdminCommand::SetSlotKind { index, kind })
        }
        "set-grid" => {
            let matrix: slotboard_engine::KindMatrix =
                arg(1, "matrix")?.parse().map_err(|e| format!("{}", e))?;
            Ok(AdminCommand::SetGrid {
                grid: matrix.to_rows(),
            })
        }
        "get-grid" => Ok(AdminCommand::GetGrid),
        "slot-details" => Ok(AdminCommand::SlotDetails),
        "reset" => Ok(AdminCommand::Reset),
        "ping" => Ok(AdminCommand::Ping),
        other => Err(format!("Unknown command: {}", other)),
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() {
        print_usage();
        std::process::exit(1);
    }

    if matches!(args[0].as_str(), "-h" | "--help" | "help") {
        print_usage();
        std::process::exit(0);
    }

    let cmd = match parse_command(&args) {
        Ok(cmd) => cmd,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    match send_command(&cmd) {
        Ok(response) => match response {
            AdminResponse::Ok { message } => {
                println!("{}", message);
            }
            AdminResponse::Error { error } => {
                eprintln!("Error: {}", error);
                std::process::exit(1);
            }
            AdminResponse::Grid { grid } => {
                for row in grid.to_rows() {
                    let cells: Vec<String> = row.iter().map(|k| k.to_string()).collect();
                    println!("{}", cells.join(" "));
                }
            }
            AdminResponse::Slots { slots } => {
                for slot in slots {
                    let occupant = slot
                        .occupant
                        .map(|t| t.label().to_string())
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "{:>2}  row {} col {}  kind {}  {}",
                        slot.index, slot.row, slot.col, slot.kind, occupant
                    );
                }
            }
            AdminResponse::Pong => {
                println!("pong - slotboard-server is running");
            }
        },
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
