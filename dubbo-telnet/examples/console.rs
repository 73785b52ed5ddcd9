//! Run line-oriented console commands (`status`, `ps`, `help`, ...).
//!
//! # Usage
//!
//! ```bash
//! cargo run --example console -- 20880 status
//! cargo run --example console -- 20880 help ls
//! ```

use std::env;

use dubbo_telnet::{ClientBuilder, Command};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some((port, words)) = args.split_first() else {
        eprintln!("usage: console <port> <command> [args...]");
        std::process::exit(2);
    };
    let port: u16 = port.parse()?;
    let arg = |n: usize| words.get(n).cloned();

    let command = match words.first().map(String::as_str) {
        Some("status") | None => Command::Status,
        Some("pwd") => Command::Pwd,
        Some("ps") => Command::Ps,
        Some("cd") => Command::Cd { service: arg(1) },
        Some("help") => Command::Help { command: arg(1) },
        Some("clear") => Command::Clear {
            lines: arg(1).and_then(|n| n.parse().ok()),
        },
        Some("log") => Command::Log {
            level: arg(1).unwrap_or_else(|| "info".to_string()),
        },
        Some(other @ ("trace" | "count")) => {
            let service = arg(1).unwrap_or_default();
            let method = arg(2).unwrap_or_default();
            let times = arg(3).and_then(|n| n.parse().ok()).unwrap_or(1);
            if other == "trace" {
                Command::Trace { service, method, times }
            } else {
                Command::Count { service, method, times }
            }
        }
        Some(other) => {
            eprintln!("unsupported command: {}", other);
            std::process::exit(2);
        }
    };

    let client = ClientBuilder::new("127.0.0.1").port(port).build()?;
    let response = client.execute(&command).await?;

    println!("{}", response);
    if response.truncated {
        eprintln!("(output truncated)");
    }
    eprintln!("{} completed in {:?}", response.command, response.elapsed);

    Ok(())
}
