use crate::error::{KvError, KvResult};
use crate::resp::RespValue;
use crate::store::{SharedStore, set_with_expiry};
use std::time::Duration;

/// SET key value [px milliseconds]
///
/// `args` is the space-joined argument string. Tokens past the expiry are ignored.
pub async fn cmd_set(args: &str, store: &SharedStore) -> KvResult<RespValue> {
    let parts: Vec<&str> = args.split(' ').collect();
    if parts.len() < 2 {
        return Err(KvError::WrongArgCount("set".to_string()));
    }
    let key = parts[0].to_string();
    let value = parts[1].to_string();

    let expiry = if parts.len() > 2 {
        if parts[2] != "px" {
            return Ok(RespValue::simple_string("invalid argument px"));
        }
        let millis = parts.get(3).ok_or(KvError::SyntaxError)?;
        let millis: u64 = millis.parse().map_err(|_| KvError::NotInteger)?;
        Some(Duration::from_millis(millis))
    } else {
        None
    };

    set_with_expiry(store, key, value, expiry).await;
    Ok(RespValue::ok())
}

/// GET key — the whole argument string is the key.
pub async fn cmd_get(key: &str, store: &SharedStore) -> RespValue {
    let db = store.lock().await;
    match db.get(key) {
        Some(value) => RespValue::simple_string(value),
        None => RespValue::null_bulk_string(),
    }
}
