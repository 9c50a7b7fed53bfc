use std::{
    error::Error,
    fmt::{self, Debug, Display, Formatter},
};

/// Error type of the annotation canvas and its ambient layers such as configuration or argument
/// parsing. The canvas operations themselves are infallible.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub struct LblError {
    msg: String,
}
impl LblError {
    pub fn new(msg: &str) -> LblError {
        LblError {
            msg: msg.to_string(),
        }
    }
    pub fn msg(&self) -> &str {
        &self.msg
    }
}
impl Display for LblError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.msg)
    }
}
impl Error for LblError {}
impl From<&str> for LblError {
    fn from(value: &str) -> Self {
        LblError::new(value)
    }
}
/// Result type with [`LblError`](LblError) as error type.
pub type LblResult<U> = Result<U, LblError>;

/// Creates an [`LblError`](LblError) with a formatted message.
/// ```rust
/// use imglabel_domain::{lblerr, LblError};
/// assert_eq!(lblerr!("some error {}", 1), LblError::new(format!("some error {}", 1).as_str()));
/// ```
#[macro_export]
macro_rules! lblerr {
    ($s:literal) => {
        $crate::result::LblError::new(format!($s).as_str())
    };
    ($s:literal, $( $exps:expr ),*) => {
        $crate::result::LblError::new(format!($s, $($exps,)*).as_str())
    }
}

pub fn to_lbl<E: Debug>(e: E) -> LblError {
    lblerr!(
        "original error type is '{:?}', error message is '{:?}'",
        std::any::type_name::<E>(),
        e
    )
}

#[test]
fn test_to_lbl() {
    let e = to_lbl(std::fmt::Error);
    assert!(e.msg().contains("fmt::Error"));
    let e: LblError = "plain".into();
    assert_eq!(format!("{e}"), "plain");
}
