pub mod server_cmd;
pub mod string;

use crate::resp::RespValue;
use crate::store::SharedStore;

/// A request decoded from one read: the lower-cased command name plus its
/// arguments joined into a single space-separated string.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Ping,
    Echo(String),
    Set(String),
    Get(String),
    Unknown(String),
}

impl Command {
    /// Build a command from a parsed request frame.
    ///
    /// Anything that is not a non-empty array maps to the empty unknown command.
    pub fn from_frame(frame: RespValue) -> Command {
        let items = match frame {
            RespValue::Array(Some(items)) if !items.is_empty() => items,
            _ => return Command::Unknown(String::new()),
        };

        let name = items[0]
            .to_string_lossy()
            .unwrap_or_default()
            .to_lowercase();
        let args = items[1..]
            .iter()
            .filter_map(RespValue::to_string_lossy)
            .collect::<Vec<_>>()
            .join(" ");

        match name.as_str() {
            "ping" => Command::Ping,
            "echo" => Command::Echo(args),
            "set" => Command::Set(args),
            "get" => Command::Get(args),
            _ => Command::Unknown(name),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Command::Ping => "ping",
            Command::Echo(_) => "echo",
            Command::Set(_) => "set",
            Command::Get(_) => "get",
            Command::Unknown(name) => name.as_str(),
        }
    }
}

/// Dispatch a parsed command to the appropriate handler.
pub async fn dispatch(command: Command, store: &SharedStore) -> RespValue {
    match command {
        Command::Ping => server_cmd::cmd_ping(),
        Command::Echo(arg) => server_cmd::cmd_echo(arg),
        Command::Set(args) => string::cmd_set(&args, store)
            .await
            .unwrap_or_else(|e| e.to_resp_error()),
        Command::Get(key) => string::cmd_get(&key, store).await,
        Command::Unknown(_) => command_not_found(),
    }
}

pub fn command_not_found() -> RespValue {
    RespValue::simple_string("command not found")
}
