//! Lockbank - operator tool for the locker controller board.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lockbank_core::{BoardAddress, DoorNumber, LockAddress};
use lockbank_hardware::{BusConfig, CommandReport, LockerController, SerialTransport};
use lockbank_protocol::{CommandFrame, CommandType};
use serde::Serialize;

/// Unlock and query doors on a locker controller board.
#[derive(Parser)]
#[command(name = "lockbank", version)]
struct Cli {
    /// Serial device the board is attached to (e.g. /dev/ttyUSB0, COM3)
    #[arg(long, global = true)]
    port: Option<String>,

    /// Board address on the bus
    #[arg(long, global = true, default_value_t = BoardAddress::SINGLE_BOARD.as_u8())]
    board: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open every door in sequence
    UnlockAll,

    /// Open one door
    Unlock { door: DoorNumber },

    /// Read whether one door is locked
    Query { door: DoorNumber },

    /// Read the state of every door
    QueryAll,

    /// Print the frame for a command code (UA, UI, QI, QA) without sending it
    Frame {
        code: CommandType,

        /// Lock address for the single-door commands
        #[arg(long, default_value_t = 0)]
        lock: u8,
    },

    /// List serial ports on this machine
    Ports,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let board = BoardAddress::new(cli.board);

    match cli.command {
        Command::Frame { code, lock } => {
            let frame = CommandFrame::for_command(code, board, LockAddress::new(lock));
            println!("{frame}");
            Ok(())
        }
        Command::Ports => {
            let ports = SerialTransport::available_ports().context("Failed to enumerate serial ports")?;
            if ports.is_empty() {
                tracing::info!("No serial ports found");
            }
            for port in ports {
                println!("{port}");
            }
            Ok(())
        }
        Command::UnlockAll => print_report(&connect(cli.port, board)?.unlock_all()?),
        Command::Unlock { door } => {
            let report = connect(cli.port, board)?.unlock_door(door)?;
            if !report.value.is_success() {
                tracing::warn!("Door {} did not release", door);
            }
            print_report(&report)
        }
        Command::Query { door } => print_report(&connect(cli.port, board)?.query_door(door)?),
        Command::QueryAll => print_report(&connect(cli.port, board)?.query_all()?),
    }
}

fn connect(port: Option<String>, board: BoardAddress) -> Result<LockerController<SerialTransport>> {
    let port = port.context("--port is required for commands that talk to the board")?;
    let config = BusConfig::new(port).with_board_address(board);
    tracing::info!("Using {} board {}", config.port, config.board_address);
    Ok(LockerController::new(config, SerialTransport))
}

fn print_report<T: Serialize>(report: &CommandReport<T>) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_unlock() {
        let cli = Cli::try_parse_from(["lockbank", "--port", "/dev/ttyUSB0", "unlock", "5"]).unwrap();
        assert_eq!(cli.port.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(cli.board, 0x01);
        assert!(matches!(cli.command, Command::Unlock { door } if door.as_u8() == 5));
    }

    #[test]
    fn test_parse_rejects_door_out_of_range() {
        assert!(Cli::try_parse_from(["lockbank", "query", "25"]).is_err());
    }

    #[test]
    fn test_parse_frame_code() {
        let cli = Cli::try_parse_from(["lockbank", "--board", "2", "frame", "qi", "--lock", "7"]).unwrap();
        assert_eq!(cli.board, 2);
        assert!(matches!(
            cli.command,
            Command::Frame { code: CommandType::QueryIndividual, lock: 7 }
        ));
    }
}
