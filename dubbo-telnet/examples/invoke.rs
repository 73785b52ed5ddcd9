//! Invoke a service method through the console.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example invoke -- --port 20880 com.foo.BarService sayHello '"world"'
//! ```

use std::env;

use dubbo_telnet::{ClientBuilder, ErrorKind};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut host = "127.0.0.1".to_string();
    let mut port = 20880u16;
    let mut positional = Vec::new();

    let args: Vec<String> = env::args().skip(1).collect();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--host" | "-h" => {
                i += 1;
                if let Some(value) = args.get(i) {
                    host = value.clone();
                }
            }
            "--port" | "-p" => {
                i += 1;
                if let Some(value) = args.get(i) {
                    port = value.parse().unwrap_or(20880);
                }
            }
            other => positional.push(other.to_string()),
        }
        i += 1;
    }

    let [service, method, rest @ ..] = positional.as_slice() else {
        eprintln!("usage: invoke [--host HOST] [--port PORT] <service> <method> [json params]");
        std::process::exit(2);
    };
    let params = rest.join(" ");

    let client = ClientBuilder::new(host).port(port).build()?;
    match client.invoke(service, method, &params).await {
        Ok(result) => {
            println!("{}", result.result);
            if result.valid {
                println!("elapsed: {} ms", result.elapsed_millis);
            }
            if result.truncated {
                eprintln!("output truncated at the buffer limit");
            }
        }
        Err(e) if e.kind() == ErrorKind::Parse => {
            eprintln!("console answered but the output was not understood: {}", e);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
