use cfg_if::cfg_if;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

const DEFAULT_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        /// Log to the browser console. Safe to call more than once.
        pub fn init() {
            let wasm_layer = tracing_wasm::WASMLayer::new(tracing_wasm::WASMLayerConfig::default());

            let _ = tracing_subscriber::registry()
                .with(env_filter())
                .with(wasm_layer)
                .try_init();

            #[cfg(feature = "console_error_panic_hook")]
            console_error_panic_hook::set_once();
        }
    } else {
        use std::path::{Path, PathBuf};
        use std::{env, io};

        use once_cell::sync::OnceCell;
        use tracing_appender::non_blocking::WorkerGuard;
        use tracing_subscriber::fmt;

        static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

        /// `RUST_LOG_FILE` or `logs/subhunt.log`, split into directory and file prefix
        fn log_file_location() -> (PathBuf, PathBuf) {
            let path = PathBuf::from(env::var("RUST_LOG_FILE").unwrap_or_else(|_| "logs/subhunt.log".to_string()));
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new(".")).to_path_buf();
            let file = path.file_name().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("subhunt.log"));
            (dir, file)
        }

        /// stderr plus a daily rolling log file
        pub fn init() {
            let console_layer = fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_level(true)
                .compact();

            let (dir, file) = log_file_location();
            let (nb_writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, file));
            let _ = FILE_GUARD.set(guard);

            let file_layer = fmt::layer()
                .with_writer(nb_writer)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_level(true)
                .compact();

            if tracing_subscriber::registry()
                .with(env_filter())
                .with(console_layer)
                .with(file_layer)
                .try_init()
                .is_err()
            {
                return;
            }

            // Route panics through tracing with a backtrace
            std::panic::set_hook(Box::new(|info| {
                let location = info
                    .location()
                    .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
                    .unwrap_or_else(|| "<unknown>".to_string());
                let payload = info
                    .payload()
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| info.payload().downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "<non-string panic>".to_string());
                let bt = std::backtrace::Backtrace::force_capture();
                tracing::error!("panic at {location}: {payload}\nBacktrace:\n{bt}");
            }));
        }

    }
}
