//! List every service exported on a console port, with its methods.
//!
//! # Prerequisites
//!
//! - A Dubbo provider with the telnet console enabled
//!
//! # Usage
//!
//! ```bash
//! cargo run --example list_services -- --host 127.0.0.1 --port 20880
//! ```

use std::env;
use std::time::Duration;

use dubbo_telnet::ClientBuilder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (set RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let client = ClientBuilder::new(&args.host)
        .port(args.port)
        .timeout(Duration::from_millis(args.timeout))
        .build()?;

    println!("Listing services on {}:{}...", args.host, args.port);
    let listing = client.list(None).await?;
    if listing.is_truncated() {
        eprintln!("warning: listing truncated at the buffer limit, some services may be missing");
    }

    for service in listing.names.iter() {
        println!("\n{}", service);
        println!("{}", "-".repeat(service.len()));
        match client.methods(service).await {
            Ok(methods) => {
                for method in methods.iter() {
                    println!("  {}", method);
                }
            }
            Err(e) => eprintln!("  {} ({:?})", e, e.kind()),
        }
    }

    Ok(())
}

/// Simple argument parser (avoiding external dependencies)
struct Args {
    host: String,
    port: u16,
    timeout: u64,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut host = "127.0.0.1".to_string();
        let mut port = 20880u16;
        let mut timeout = 3000u64;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--host" | "-h" => {
                    i += 1;
                    if i < args.len() {
                        host = args[i].clone();
                    }
                }
                "--port" | "-p" => {
                    i += 1;
                    if i < args.len() {
                        port = args[i].parse().unwrap_or(20880);
                    }
                }
                "--timeout" | "-t" => {
                    i += 1;
                    if i < args.len() {
                        timeout = args[i].parse().unwrap_or(3000);
                    }
                }
                _ => {
                    eprintln!("Unknown argument: {}", args[i]);
                }
            }
            i += 1;
        }

        Self {
            host,
            port,
            timeout,
        }
    }
}
