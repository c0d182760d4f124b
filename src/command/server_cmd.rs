use crate::resp::RespValue;

pub fn cmd_ping() -> RespValue {
    RespValue::simple_string("PONG")
}

/// Echo the argument string back verbatim as a status reply.
pub fn cmd_echo(arg: String) -> RespValue {
    RespValue::SimpleString(arg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping() {
        assert_eq!(cmd_ping().serialize(), b"+PONG\r\n");
    }

    #[test]
    fn test_echo() {
        assert_eq!(cmd_echo("hello".into()).serialize(), b"+hello\r\n");
        assert_eq!(cmd_echo("hello world".into()).serialize(), b"+hello world\r\n");
        assert_eq!(cmd_echo(String::new()).serialize(), b"+\r\n");
    }
}
