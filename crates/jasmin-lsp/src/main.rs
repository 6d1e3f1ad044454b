//! Jasmin Language Server binary
//!
//! This binary implements a Language Server Protocol server for Jasmin
//! that can be used with any LSP-compatible editor.
//!
//! Usage:
//!   jasmin-lsp \[options\]
//!
//! Options:
//!   --stdio        Use stdio for communication (default)
//!   --log-level    Log filter (e.g. debug, jasmin_lsp=trace)
//!   --health       Quick health check
//!   --version      Show version information
//!   --help         Show this help message

use std::env;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut log_level: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--stdio" => {}
            "--log-level" => {
                if i + 1 < args.len() {
                    log_level = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--health" => {
                println!("ok {}", env!("CARGO_PKG_VERSION"));
                process::exit(0);
            }
            "--version" => {
                println!("jasmin-lsp {}", env!("CARGO_PKG_VERSION"));
                process::exit(0);
            }
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown option: {other}");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    let _guard = jasmin_lsp::logging::init_logging(log_level.as_deref());
    tracing::info!("jasmin-lsp {} starting (stdio)", env!("CARGO_PKG_VERSION"));

    if let Err(e) = jasmin_lsp::run_stdio() {
        tracing::error!("server error: {e}");
        process::exit(1);
    }
}

fn print_help() {
    eprintln!("Jasmin Language Server");
    eprintln!();
    eprintln!("Usage: jasmin-lsp [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --stdio        Use stdio for communication (default)");
    eprintln!("  --log-level    Log filter (e.g. debug, jasmin_lsp=trace)");
    eprintln!("  --health       Quick health check (prints 'ok <version>')");
    eprintln!("  --version      Show version information");
    eprintln!("  --help         Show this help message");
}
