//! Diagnostic logging.
//!
//! Installs a `tracing` subscriber that writes to stderr, so log lines never
//! mix with command output on stdout.
//! - `RUST_LOG` overrides the filter
//! - default is `daybook=warn`, or `daybook=debug` with `--verbose`
//! - `RUST_LOG_FORMAT=json` switches to JSON lines

use tracing_subscriber::EnvFilter;

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "daybook=debug"
    } else {
        "daybook=warn"
    }
}

/// Safe to call more than once; later calls are no-ops.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let is_json = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if is_json {
        let _ = subscriber.json().try_init();
    } else {
        let _ = subscriber.try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_is_fine() {
        init(false);
        init(true);
    }

    #[test]
    fn verbose_lowers_the_level() {
        assert_eq!(default_directive(false), "daybook=warn");
        assert_eq!(default_directive(true), "daybook=debug");
    }
}
