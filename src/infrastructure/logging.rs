use std::io;

use anyhow::Result;
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::{config::AppConfig, infrastructure::directories::ResolvedPaths};

static INIT: OnceCell<()> = OnceCell::new();
static GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();

// HTTP internals log every connection at debug; keep them at warn unless
// RUST_LOG asks otherwise.
const QUIET_DEPENDENCIES: [&str; 4] = ["hyper", "hyper_util", "reqwest", "rustls"];

fn default_directives(level: &str) -> String {
    let mut directives = vec![level.trim().to_string()];
    directives.extend(QUIET_DEPENDENCIES.iter().map(|dep| format!("{dep}=warn")));
    directives.join(",")
}

pub fn init_tracing(config: &AppConfig, paths: &ResolvedPaths) -> Result<()> {
    INIT.get_or_try_init::<_, anyhow::Error>(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_directives(&config.logging.level)))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let file_appender = tracing_appender::rolling::daily(&paths.logs_dir, "harvest.log");
        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
        let _ = GUARD.set(guard);

        let console_layer = fmt::layer()
            .compact()
            .with_writer(io::stdout)
            .with_target(true)
            .with_ansi(true);

        let file_layer = fmt::layer()
            .with_writer(file_writer)
            .with_target(true)
            .with_ansi(false);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .try_init()?;

        tracing::info!(
            logs = %paths.logs_dir.display(),
            level = %config.logging.level,
            "tracing initialized"
        );
        Ok(())
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directives_quiet_http_stack() {
        let directives = default_directives(" debug ");
        assert_eq!(
            directives,
            "debug,hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn"
        );
        assert!(EnvFilter::try_new(&directives).is_ok());
    }
}
