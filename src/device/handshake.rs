use crate::device::link::LineSource;
use std::io;
use std::time::{Duration, Instant};
use thiserror::Error;

/// What the controller prints from its `setup()`.
pub const HELLO_TOKEN: &str = "start";
pub const HELLO_BUDGET: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum HandshakeError {
    #[error("didn't see '{token}' in {:.2} secs", .waited.as_secs_f32())]
    Timeout { token: String, waited: Duration },
    #[error("serial link failed during handshake: {0}")]
    Link(#[from] io::Error),
}

/// Reads lines until one contains `token` or `budget` runs out.
///
/// The controller tends to print some noise while it resets, so the token only has
/// to appear somewhere in a line.
#[tracing::instrument(skip(source))]
pub fn negotiate(
    source: &mut impl LineSource,
    token: &str,
    budget: Duration,
) -> Result<Duration, HandshakeError> {
    let start = Instant::now();
    while start.elapsed() < budget {
        let Some(line) = source.read_line()? else {
            continue;
        };
        if line.contains(token) {
            let waited = start.elapsed();
            tracing::info!("saw '{}' in {:5.2} secs", token, waited.as_secs_f32());
            return Ok(waited);
        }
        tracing::debug!("> {}", line);
    }
    Err(HandshakeError::Timeout {
        token: token.to_string(),
        waited: start.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::link::tests::Script;

    #[test]
    fn token_after_noise() {
        let mut source = Script::new(&[None, Some("\u{0}garbage"), Some("xxstart\r"), Some("+1")]);
        assert!(negotiate(&mut source, HELLO_TOKEN, HELLO_BUDGET).is_ok());
        // the line after the greeting is left for the control loop
        assert_eq!(source.read_line().unwrap().as_deref(), Some("+1"));
    }

    #[test]
    fn silence_exhausts_the_budget() {
        let mut source = Script::new(&[Some("hello"), Some("+1")]);
        let err = negotiate(&mut source, HELLO_TOKEN, Duration::from_millis(20)).unwrap_err();
        match err {
            HandshakeError::Timeout { token, waited } => {
                assert_eq!(token, "start");
                assert!(waited >= Duration::from_millis(20));
            }
            other => panic!("expected a timeout, got {other:?}"),
        }
    }

    #[test]
    fn zero_budget_never_reads() {
        let mut source = Script::new(&[Some("start")]);
        assert!(negotiate(&mut source, HELLO_TOKEN, Duration::ZERO).is_err());
        assert_eq!(source.read_line().unwrap().as_deref(), Some("start"));
    }

    #[test]
    fn dead_link_fails_at_once() {
        let mut source = Script::unplugged(&[Some("noise")]);
        let err = negotiate(&mut source, HELLO_TOKEN, HELLO_BUDGET).unwrap_err();
        assert!(matches!(err, HandshakeError::Link(_)));
    }
}
