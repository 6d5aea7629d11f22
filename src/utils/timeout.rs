use anyhow::Context;
use std::time::Duration;

/// Parses a timeout given in (fractional) seconds. Negative, non-finite and overly large
/// values are rejected.
///
/// # Example
/// ```
/// use tours::utils::parse_timeout;
/// use std::time::Duration;
/// assert_eq!(parse_timeout("1.5").unwrap(), Duration::from_millis(1500));
/// assert!(parse_timeout("-1").is_err());
/// ```
pub fn parse_timeout(seconds: &str) -> anyhow::Result<Duration> {
    let seconds: f64 = seconds
        .trim()
        .parse()
        .with_context(|| format!("cannot parse timeout {seconds:?}"))?;

    Duration::try_from_secs_f64(seconds)
        .with_context(|| format!("timeout must be a non-negative number of seconds, got {seconds}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_timeouts() {
        assert_eq!(parse_timeout("0").unwrap(), Duration::ZERO);
        assert_eq!(parse_timeout("2").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_timeout(" 0.25 ").unwrap(), Duration::from_millis(250));
    }

    #[test]
    fn invalid_timeouts() {
        for input in ["-1", "-0.5", "NaN", "inf", "1e30", "ten", ""] {
            assert!(parse_timeout(input).is_err(), "input: {input:?}");
        }
    }
}
