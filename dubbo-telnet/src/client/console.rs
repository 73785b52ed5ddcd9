//! Console client: one connection per command.

use std::time::Instant;

use log::{debug, warn};

use super::builder::ClientBuilder;
use super::command::{Command, CommandRequest};
use super::invoke::{InvokeResult, parse_invoke_result, parse_truncated_invoke_result};
use super::names::{Listing, NameCollector, NameList};
use super::response::Response;
use crate::channel::{LineOutput, LineReader, PromptReader, RawResponse, Sentinel};
use crate::error::{Error, Result};
use crate::transport::{ConsoleConfig, Session};

/// Client for the administrative console.
///
/// Every call opens its own [`Session`], sends one command, reads up to the
/// prompt and closes the session before returning, on success and on every
/// error path. The client holds no connection state, so one instance can
/// serve concurrent callers.
///
/// # Example
///
/// ```rust,no_run
/// use dubbo_telnet::ClientBuilder;
///
/// # async fn example() -> Result<(), dubbo_telnet::Error> {
/// let client = ClientBuilder::new("127.0.0.1").port(20880).build()?;
///
/// for service in client.services().await?.iter() {
///     println!("{}", service);
/// }
///
/// let result = client
///     .invoke("com.foo.BarService", "sayHello", r#""world""#)
///     .await?;
/// println!("{} ({} ms)", result.result, result.elapsed_millis);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ConsoleClient {
    /// Connection and read-loop settings.
    config: ConsoleConfig,

    /// Compiled prompt.
    sentinel: Sentinel,
}

impl ConsoleClient {
    /// Create a client after validating the configuration.
    pub fn new(config: ConsoleConfig) -> Result<Self> {
        if config.prompt.is_empty() {
            return Err(invalid("prompt must not be empty"));
        }
        if config.max_buffer_size == 0 {
            return Err(invalid("max_buffer_size must be greater than zero"));
        }
        if config.list_chunk_size == 0 || config.invoke_chunk_size == 0 || config.line_chunk_size == 0
        {
            return Err(invalid("chunk sizes must be greater than zero"));
        }

        let sentinel = Sentinel::new(&config.prompt);
        Ok(Self { config, sentinel })
    }

    /// Start building a client for `host`.
    pub fn builder(host: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(host)
    }

    /// Get the configuration.
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Same settings, different console port.
    pub fn with_port(&self, port: u16) -> Self {
        let mut client = self.clone();
        client.config.port = port;
        client
    }

    /// The request this client would send for `command`.
    pub fn request(&self, command: &Command) -> CommandRequest {
        CommandRequest::new(&self.config.host, self.config.port, command.line())
    }

    /// Run `ls [<service>]` and extract the short names from its output.
    pub async fn list(&self, service: Option<&str>) -> Result<Listing> {
        let command = Command::Ls {
            service: service.map(str::to_string),
        };
        self.read_listing(&self.request(&command))
            .await
            .map_err(|e| e.context(command.operation()))
    }

    /// Short names of all exported services.
    pub async fn services(&self) -> Result<NameList> {
        Ok(self.list(None).await?.names)
    }

    /// Method names of `service`.
    pub async fn methods(&self, service: &str) -> Result<NameList> {
        Ok(self.list(Some(service)).await?.names)
    }

    /// Invoke `service.method(params)`; `params` is the JSON argument list
    /// without the surrounding parentheses.
    pub async fn invoke(&self, service: &str, method: &str, params: &str) -> Result<InvokeResult> {
        let command = Command::Invoke {
            service: service.to_string(),
            method: method.to_string(),
            params: params.to_string(),
        };
        let request = self.request(&command);

        let outcome = async {
            let raw = self.read_block(&request).await?;
            if raw.is_truncated() {
                warn!("invoke output truncated at {} bytes", self.config.max_buffer_size);
                Ok::<_, Error>(parse_truncated_invoke_result(&raw.text))
            } else {
                Ok(parse_invoke_result(&raw.text)?)
            }
        }
        .await;

        outcome.map_err(|e| e.context(command.operation()))
    }

    /// Send any command and collect its output line by line.
    pub async fn execute(&self, command: &Command) -> Result<Response> {
        let request = self.request(command);
        let start = Instant::now();

        let output = self
            .read_lines(&request)
            .await
            .map_err(|e| e.context(command.operation()))?;

        Ok(Response::new(
            request.command_line,
            output.text(),
            start.elapsed(),
            output.state.is_truncated(),
        ))
    }

    /// `status`
    pub async fn status(&self) -> Result<Response> {
        self.execute(&Command::Status).await
    }

    /// `pwd`
    pub async fn pwd(&self) -> Result<Response> {
        self.execute(&Command::Pwd).await
    }

    /// `trace <service> <method> <times>`
    pub async fn trace(&self, service: &str, method: &str, times: u32) -> Result<Response> {
        self.execute(&Command::Trace {
            service: service.to_string(),
            method: method.to_string(),
            times,
        })
        .await
    }

    /// `count <service> <method> <times>`
    pub async fn count(&self, service: &str, method: &str, times: u32) -> Result<Response> {
        self.execute(&Command::Count {
            service: service.to_string(),
            method: method.to_string(),
            times,
        })
        .await
    }

    /// `clear [<lines>]`
    pub async fn clear(&self, lines: Option<u32>) -> Result<Response> {
        self.execute(&Command::Clear { lines }).await
    }

    /// `log <level>`
    pub async fn log(&self, level: &str) -> Result<Response> {
        self.execute(&Command::Log {
            level: level.to_string(),
        })
        .await
    }

    /// `ps`
    pub async fn ps(&self) -> Result<Response> {
        self.execute(&Command::Ps).await
    }

    /// `cd [<service>]`
    pub async fn cd(&self, service: Option<&str>) -> Result<Response> {
        self.execute(&Command::Cd {
            service: service.map(str::to_string),
        })
        .await
    }

    /// `help [<command>]`
    pub async fn help(&self, command: Option<&str>) -> Result<Response> {
        self.execute(&Command::Help {
            command: command.map(str::to_string),
        })
        .await
    }

    async fn open_session(&self, request: &CommandRequest) -> Result<Session> {
        let mut session = Session::open(&request.host, request.port, self.config.timeout).await?;
        session.set_read_timeout(self.config.timeout);
        debug!("{} <- {}", session.peer(), request.command_line);
        Ok(session)
    }

    /// List mode: names are extracted as segments arrive.
    async fn read_listing(&self, request: &CommandRequest) -> Result<Listing> {
        let mut session = self.open_session(request).await?;

        let outcome = async {
            session.send_line(&request.command_line).await?;

            let mut reader = PromptReader::new(
                &mut session,
                &self.sentinel,
                self.config.list_chunk_size,
                self.config.max_buffer_size,
            );
            let mut collector = NameCollector::new();
            while let Some(segment) = reader.next_segment().await? {
                collector.feed(&segment);
            }

            Ok::<_, Error>(Listing {
                state: reader.state(),
                names: collector.finish(),
            })
        }
        .await;

        session.close().await;
        outcome
    }

    /// Whole-block mode: the output before the prompt is one payload.
    async fn read_block(&self, request: &CommandRequest) -> Result<RawResponse> {
        let mut session = self.open_session(request).await?;

        let outcome = async {
            session.send_line(&request.command_line).await?;
            PromptReader::new(
                &mut session,
                &self.sentinel,
                self.config.invoke_chunk_size,
                self.config.max_buffer_size,
            )
            .read_to_end()
            .await
        }
        .await;

        session.close().await;
        outcome
    }

    /// Line mode: read until a line begins with the prompt.
    async fn read_lines(&self, request: &CommandRequest) -> Result<LineOutput> {
        let mut session = self.open_session(request).await?;

        let outcome = async {
            session.send_line(&request.command_line).await?;
            LineReader::new(
                &mut session,
                &self.sentinel,
                self.config.line_chunk_size,
                self.config.max_buffer_size,
            )
            .read_lines()
            .await
        }
        .await;

        session.close().await;
        outcome
    }
}

fn invalid(message: &str) -> Error {
    Error::InvalidConfig {
        message: message.to_string(),
    }
}
