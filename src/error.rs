#[derive(Debug, thiserror::Error)]
pub enum KvError {
    #[error("ERR wrong number of arguments for '{0}' command")]
    WrongArgCount(String),

    #[error("ERR value is not an integer or out of range")]
    NotInteger,

    #[error("ERR syntax error")]
    SyntaxError,

    #[error("ERR Protocol error: {0}")]
    Protocol(#[from] crate::resp::RespError),

    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl KvError {
    pub fn to_resp_error(&self) -> crate::resp::RespValue {
        crate::resp::RespValue::error(self.to_string())
    }
}

pub type KvResult<T> = Result<T, KvError>;
