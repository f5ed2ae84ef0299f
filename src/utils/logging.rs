use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the logging system
pub fn init_logging(verbose: bool, log_file: Option<PathBuf>) -> Result<()> {
    let env_filter = EnvFilter::from_default_env()
        .add_directive(crate_directive(verbose).parse()?)
        .add_directive("warn".parse()?);

    let fmt_layer = fmt::layer()
        .with_target(verbose)
        .with_span_events(FmtSpan::CLOSE);

    // If a log file is specified, mirror everything into it
    if let Some(log_file) = log_file {
        if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = fs::File::create(log_file)?;
        let file_layer = fmt::layer()
            .with_target(true)
            .with_ansi(false)
            .with_writer(file);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init();
    }

    Ok(())
}

/// Log level for this crate's own targets, named after the compiled crate
fn crate_directive(verbose: bool) -> &'static str {
    if verbose {
        concat!(env!("CARGO_CRATE_NAME"), "=debug")
    } else {
        concat!(env!("CARGO_CRATE_NAME"), "=info")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directives_parse() {
        for verbose in [false, true] {
            let directive: Result<tracing_subscriber::filter::Directive, _> = crate_directive(verbose).parse();
            assert!(directive.is_ok());
        }
    }

    #[test]
    fn test_directive_targets_this_crate() {
        let crate_target = module_path!().split("::").next().unwrap();

        assert_eq!(crate_directive(false), format!("{}=info", crate_target));
        assert_eq!(crate_directive(true), format!("{}=debug", crate_target));
    }
}
