use std::fmt::Display;

/// Converts a failed read into "no record".
///
/// Used by stores that favour availability over precise diagnostics: a
/// backend error, a malformed value and a missing key all come back as
/// `None`. Failures are logged so they are not lost entirely.
pub trait FailOpen<T> {
    fn fail_open(self, store: &'static str) -> Option<T>;
}

impl<T, E> FailOpen<T> for Result<Option<T>, E>
where
    E: Display,
{
    fn fail_open(self, store: &'static str) -> Option<T> {
        match self {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(store, %error, "session read failed, treating record as absent");
                None
            }
        }
    }
}
