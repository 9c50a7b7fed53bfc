use std::fmt::Debug;
use tracing::{error, warn};

pub fn trace_ok_err<T, E>(x: Result<T, E>) -> Option<T>
where
    E: Debug,
{
    match x {
        Ok(x) => Some(x),
        Err(e) => {
            error!("{e:?}");
            None
        }
    }
}
pub fn trace_ok_warn<T, E>(x: Result<T, E>) -> Option<T>
where
    E: Debug,
{
    match x {
        Ok(x) => Some(x),
        Err(e) => {
            warn!("{e:?}");
            None
        }
    }
}
/// Like [`trace_ok_warn`](trace_ok_warn) but falls back to `default`.
pub fn warn_or<T, E>(x: Result<T, E>, default: T) -> T
where
    E: Debug,
{
    trace_ok_warn(x).unwrap_or(default)
}

#[test]
fn test_warn_or() {
    let ok: Result<u8, &str> = Ok(1);
    assert_eq!(warn_or(ok, 2), 1);
    let err: Result<u8, &str> = Err("nope");
    assert_eq!(warn_or(err, 2), 2);
    assert_eq!(trace_ok_err(err), None);
}
