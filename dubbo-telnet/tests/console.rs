//! End-to-end tests against a scripted console on localhost.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use dubbo_telnet::monitor::{InvokeMethodRequest, MethodsQuery, ServicesQuery};
use dubbo_telnet::{ClientBuilder, ConsoleClient, ErrorKind, MonitorService, ReadState};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

/// How the fake console answers one command.
enum Reply {
    /// Write the chunks (with a pause between them), then wait for the
    /// client to hang up.
    Chunks(Vec<Vec<u8>>),
    /// Write the chunks, then close the connection.
    ChunksThenHangUp(Vec<Vec<u8>>),
    /// Never answer.
    Silent,
}

fn chunks(parts: &[&str]) -> Vec<Vec<u8>> {
    parts.iter().map(|p| p.as_bytes().to_vec()).collect()
}

struct FakeConsole {
    port: u16,
    commands: Arc<Mutex<Vec<String>>>,
    closed_by_client: Arc<AtomicUsize>,
}

impl FakeConsole {
    async fn start(reply: fn(&str) -> Reply) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let commands = Arc::new(Mutex::new(Vec::new()));
        let closed_by_client = Arc::new(AtomicUsize::new(0));

        let seen = commands.clone();
        let closed = closed_by_client.clone();
        tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    return;
                };
                socket.set_nodelay(true).unwrap();
                let seen = seen.clone();
                let closed = closed.clone();
                tokio::spawn(async move {
                    let (read_half, mut write_half) = socket.into_split();
                    let mut reader = BufReader::new(read_half);
                    let mut line = String::new();
                    if reader.read_line(&mut line).await.unwrap_or(0) == 0 {
                        return;
                    }
                    let command = line.trim_end_matches('\n').to_string();
                    seen.lock().unwrap().push(command.clone());

                    let hang_up = match reply(&command) {
                        Reply::Chunks(parts) => {
                            write_parts(&mut write_half, parts).await;
                            false
                        }
                        Reply::ChunksThenHangUp(parts) => {
                            write_parts(&mut write_half, parts).await;
                            true
                        }
                        Reply::Silent => false,
                    };
                    if hang_up {
                        return;
                    }

                    // A client closing with unread data resets instead of
                    // sending FIN; both count as hanging up.
                    let mut buf = [0u8; 64];
                    loop {
                        match reader.read(&mut buf).await {
                            Ok(0) | Err(_) => {
                                closed.fetch_add(1, Ordering::SeqCst);
                                break;
                            }
                            Ok(_) => {}
                        }
                    }
                });
            }
        });

        Self {
            port,
            commands,
            closed_by_client,
        }
    }

    fn client(&self) -> ConsoleClient {
        ClientBuilder::new("127.0.0.1")
            .port(self.port)
            .timeout(Duration::from_millis(500))
            .build()
            .unwrap()
    }

    fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    /// Wait until the client has closed `n` connections.
    async fn assert_closed(&self, n: usize) {
        let deadline = Instant::now() + Duration::from_secs(2);
        while self.closed_by_client.load(Ordering::SeqCst) < n {
            assert!(Instant::now() < deadline, "client did not close its session");
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

async fn write_parts(writer: &mut tokio::net::tcp::OwnedWriteHalf, parts: Vec<Vec<u8>>) {
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        if writer.write_all(part).await.is_err() {
            return;
        }
        let _ = writer.flush().await;
    }
}

fn ls_reply(command: &str) -> Reply {
    match command {
        "ls" => Reply::Chunks(chunks(&[
            "com.foo.BarService\r\norg.baz.Ot",
            "her\r\ncom.foo.BarService\r\ndub",
            "bo>",
        ])),
        "ls com.foo.BarService" => Reply::Chunks(chunks(&["sayHello\r\nsayBye\r\ndubbo>"])),
        _ => Reply::Chunks(chunks(&["Unsupported command\r\ndubbo>"])),
    }
}

#[tokio::test]
async fn test_services_reassembled_across_reads() {
    let console = FakeConsole::start(ls_reply).await;
    let client = console.client();

    let listing = client.list(None).await.unwrap();
    assert_eq!(listing.names.into_vec(), vec!["BarService", "Other"]);
    assert_eq!(listing.state, ReadState::SentinelFound);
    assert_eq!(console.commands(), vec!["ls"]);
    console.assert_closed(1).await;
}

#[tokio::test]
async fn test_methods_of_service() {
    let console = FakeConsole::start(ls_reply).await;
    let methods = console.client().methods("com.foo.BarService").await.unwrap();
    assert_eq!(methods.into_vec(), vec!["sayHello", "sayBye"]);
    assert_eq!(console.commands(), vec!["ls com.foo.BarService"]);
}

#[tokio::test]
async fn test_each_command_uses_its_own_connection() {
    let console = FakeConsole::start(ls_reply).await;
    let client = console.client();
    client.services().await.unwrap();
    client.methods("com.foo.BarService").await.unwrap();
    assert_eq!(console.commands().len(), 2);
    console.assert_closed(2).await;
}

fn invoke_reply(command: &str) -> Reply {
    match command {
        r#"invoke com.foo.BarService.sayHello("world")"# => {
            Reply::Chunks(chunks(&["\"Hello world\"\r\nelapsed: 15 ms.\r\n", "dubbo>"]))
        }
        r#"invoke com.foo.BarService.broken()"# => {
            Reply::Chunks(chunks(&["null\r\nelapsed: ? ms.\r\ndubbo>"]))
        }
        _ => Reply::Chunks(chunks(&["No such method broken in service BarService\r\ndubbo>"])),
    }
}

#[tokio::test]
async fn test_invoke() {
    let console = FakeConsole::start(invoke_reply).await;
    let result = console
        .client()
        .invoke("com.foo.BarService", "sayHello", r#""world""#)
        .await
        .unwrap();
    assert_eq!(result.result, "\"Hello world\"");
    assert_eq!(result.elapsed_millis, 15);
    assert!(result.valid);
    assert!(!result.truncated);
    console.assert_closed(1).await;
}

#[tokio::test]
async fn test_invoke_console_error_message() {
    let console = FakeConsole::start(invoke_reply).await;
    let result = console
        .client()
        .invoke("com.foo.BarService", "missing", "")
        .await
        .unwrap();
    assert_eq!(result.result, "No such method broken in service BarService");
    assert_eq!(result.elapsed_millis, 0);
    assert!(!result.valid);
}

#[tokio::test]
async fn test_invoke_parse_error_closes_session() {
    let console = FakeConsole::start(invoke_reply).await;
    let err = console
        .client()
        .invoke("com.foo.BarService", "broken", "")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert_eq!(err.operation(), Some("failed to invoke service method"));
    console.assert_closed(1).await;
}

fn line_reply(command: &str) -> Reply {
    match command {
        "status" => Reply::Chunks(chunks(&[
            "+------------+--------+\r\n| resource   | status |\r\n",
            "+------------+--------+\r\n| threadpool | OK     |\r\n+------------+--------+\r\ndubbo>",
        ])),
        "trace com.foo.BarService sayHello 2" => Reply::Chunks(chunks(&[
            "com.foo.BarService.sayHello(\"a\") -> \"A\"\r\nelapsed: 1 ms.\r\n",
            "dubbo>",
        ])),
        "help status" => Reply::ChunksThenHangUp(chunks(&["Show status.\r\n"])),
        _ => Reply::Silent,
    }
}

#[tokio::test]
async fn test_status_lines() {
    let console = FakeConsole::start(line_reply).await;
    let response = console.client().status().await.unwrap();
    assert_eq!(response.command, "status");
    assert_eq!(response.lines().count(), 5);
    assert!(response.contains("| threadpool | OK     |"));
    assert!(!response.result.contains("dubbo>"));
    assert!(!response.truncated);
    console.assert_closed(1).await;
}

#[tokio::test]
async fn test_trace_command_line() {
    let console = FakeConsole::start(line_reply).await;
    let response = console
        .client()
        .trace("com.foo.BarService", "sayHello", 2)
        .await
        .unwrap();
    assert_eq!(
        response.result,
        "com.foo.BarService.sayHello(\"a\") -> \"A\"\nelapsed: 1 ms."
    );
    assert_eq!(console.commands(), vec!["trace com.foo.BarService sayHello 2"]);
}

#[tokio::test]
async fn test_peer_hang_up_returns_partial_output() {
    let console = FakeConsole::start(line_reply).await;
    let response = console.client().help(Some("status")).await.unwrap();
    assert_eq!(response.result, "Show status.");
}

#[tokio::test]
async fn test_silent_console_times_out() {
    let console = FakeConsole::start(line_reply).await;
    let client = ClientBuilder::new("127.0.0.1")
        .port(console.port)
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();

    let start = Instant::now();
    let err = client.ps().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert_eq!(err.operation(), Some("failed to list server ports"));
    assert!(start.elapsed() < Duration::from_secs(2));
    console.assert_closed(1).await;
}

#[tokio::test]
async fn test_listing_without_prompt_keeps_partial_names() {
    fn reply(_: &str) -> Reply {
        Reply::ChunksThenHangUp(chunks(&["com.foo.BarService\r\ncom.foo.Qux"]))
    }
    let console = FakeConsole::start(reply).await;
    let listing = console.client().list(None).await.unwrap();
    assert_eq!(listing.state, ReadState::StreamClosed);
    assert_eq!(listing.names.into_vec(), vec!["BarService", "Qux"]);
}

#[tokio::test]
async fn test_large_listing_is_truncated_not_failed() {
    fn reply(_: &str) -> Reply {
        let body: String = (0..100)
            .map(|i| format!("com.example.Service{:03}\r\n", i))
            .collect();
        Reply::Chunks(vec![body.into_bytes(), b"dubbo>".to_vec()])
    }
    let console = FakeConsole::start(reply).await;
    let client = ClientBuilder::new("127.0.0.1")
        .port(console.port)
        .timeout(Duration::from_millis(500))
        .max_buffer_size(256)
        .chunk_sizes(64, 4096, 1024)
        .build()
        .unwrap();

    let listing = client.list(None).await.unwrap();
    assert!(listing.is_truncated());
    assert!(!listing.names.is_empty());
    assert!(listing.names.len() < 100);
    assert_eq!(listing.names.iter().next(), Some("Service000"));
    console.assert_closed(1).await;
}

#[tokio::test]
async fn test_invoke_cut_inside_timing_line_is_not_an_error() {
    fn reply(_: &str) -> Reply {
        let value = format!("\"{}\"", "x".repeat(198));
        Reply::Chunks(vec![
            value.into_bytes(),
            b"\r\nelapsed: 1".to_vec(),
            b"5 ms.\r\ndubbo>".to_vec(),
        ])
    }
    let console = FakeConsole::start(reply).await;
    let client = ClientBuilder::new("127.0.0.1")
        .port(console.port)
        .timeout(Duration::from_millis(500))
        .max_buffer_size(211)
        .build()
        .unwrap();

    let result = client
        .invoke("com.foo.BarService", "echo", r#""x""#)
        .await
        .unwrap();
    assert!(result.truncated);
    assert!(!result.valid);
    assert_eq!(result.elapsed_millis, 0);
    assert_eq!(result.result.len(), 200);
    console.assert_closed(1).await;
}

#[tokio::test]
async fn test_unreachable_console() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = ClientBuilder::new("127.0.0.1").port(port).build().unwrap();

    let err = client.services().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Connect);
    assert!(
        err.to_string().starts_with("failed to retrieve service list: "),
        "{}",
        err
    );
}

#[tokio::test]
async fn test_monitor_service() {
    fn reply(command: &str) -> Reply {
        match command {
            "ls" => ls_reply(command),
            "ls com.foo.BarService" => ls_reply(command),
            _ => invoke_reply(command),
        }
    }
    let console = FakeConsole::start(reply).await;
    let monitor = MonitorService::new(ClientBuilder::new("127.0.0.1").build().unwrap());

    let services = monitor
        .get_all_services(&ServicesQuery { port: console.port })
        .await
        .unwrap();
    assert_eq!(services.services, vec!["BarService", "Other"]);

    let methods = monitor
        .get_methods(&MethodsQuery {
            port: console.port,
            service: "com.foo.BarService".into(),
        })
        .await
        .unwrap();
    assert_eq!(methods.methods, vec!["sayHello", "sayBye"]);

    let invoked = monitor
        .invoke_method(&InvokeMethodRequest {
            port: console.port,
            service_name: "com.foo.BarService".into(),
            method_name: "sayHello".into(),
            json_params: r#""world""#.into(),
        })
        .await
        .unwrap();
    assert_eq!(invoked.result, "\"Hello world\"");
    assert_eq!(invoked.time, 15);
}
