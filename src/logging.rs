use tracing_subscriber::EnvFilter;

/// 診断ログを標準エラーへ出す。`RUST_LOG` があればそれを優先
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
