//! Console command vocabulary.

use std::fmt;

/// A command understood by the administrative console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `ls [<service>]` - list services, or the methods of one service.
    Ls { service: Option<String> },

    /// `invoke <service>.<method>(<params>)`
    Invoke {
        service: String,
        method: String,
        params: String,
    },

    /// `status`
    Status,

    /// `pwd`
    Pwd,

    /// `trace <service> <method> <times>`
    Trace {
        service: String,
        method: String,
        times: u32,
    },

    /// `count <service> <method> <times>`
    Count {
        service: String,
        method: String,
        times: u32,
    },

    /// `clear [<lines>]`
    Clear { lines: Option<u32> },

    /// `log <level>`
    Log { level: String },

    /// `ps`
    Ps,

    /// `cd [<service>]`
    Cd { service: Option<String> },

    /// `help [<command>]`
    Help { command: Option<String> },
}

impl Command {
    /// The command keyword.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Ls { .. } => "ls",
            Command::Invoke { .. } => "invoke",
            Command::Status => "status",
            Command::Pwd => "pwd",
            Command::Trace { .. } => "trace",
            Command::Count { .. } => "count",
            Command::Clear { .. } => "clear",
            Command::Log { .. } => "log",
            Command::Ps => "ps",
            Command::Cd { .. } => "cd",
            Command::Help { .. } => "help",
        }
    }

    /// The line sent over the socket, without the terminator.
    pub fn line(&self) -> String {
        match self {
            Command::Ls { service } => with_arg("ls", service.as_deref()),
            Command::Invoke {
                service,
                method,
                params,
            } => format!("invoke {}.{}({})", service, method, params),
            Command::Trace {
                service,
                method,
                times,
            } => format!("trace {} {} {}", service, method, times),
            Command::Count {
                service,
                method,
                times,
            } => format!("count {} {} {}", service, method, times),
            Command::Clear { lines } => match lines {
                Some(lines) => format!("clear {}", lines),
                None => "clear".to_string(),
            },
            Command::Log { level } => format!("log {}", level),
            Command::Cd { service } => with_arg("cd", service.as_deref()),
            Command::Help { command } => with_arg("help", command.as_deref()),
            Command::Status | Command::Pwd | Command::Ps => self.name().to_string(),
        }
    }

    /// Message prefixed to errors raised while running this command.
    pub fn operation(&self) -> &'static str {
        match self {
            Command::Ls { service: None } => "failed to retrieve service list",
            Command::Ls { service: Some(_) } => "failed to retrieve method list",
            Command::Invoke { .. } => "failed to invoke service method",
            Command::Status => "failed to get service status",
            Command::Pwd => "failed to print current service",
            Command::Trace { .. } => "failed to trace service calls",
            Command::Count { .. } => "failed to count service calls",
            Command::Clear { .. } => "failed to clear screen",
            Command::Log { .. } => "failed to change log level",
            Command::Ps => "failed to list server ports",
            Command::Cd { .. } => "failed to change default service",
            Command::Help { .. } => "failed to get help",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.line())
    }
}

fn with_arg(keyword: &str, arg: Option<&str>) -> String {
    match arg {
        Some(arg) => format!("{} {}", keyword, arg),
        None => keyword.to_string(),
    }
}

/// Where a command goes and what is sent. Built per call, consumed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    /// Console host.
    pub host: String,

    /// Console port.
    pub port: u16,

    /// Line sent to the console.
    pub command_line: String,
}

impl CommandRequest {
    pub fn new(host: impl Into<String>, port: u16, command_line: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            command_line: command_line.into(),
        }
    }
}
