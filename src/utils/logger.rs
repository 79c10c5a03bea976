use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn build_filter(verbose: bool) -> EnvFilter {
    let default = if verbose {
        "gbizinfo_mcp=debug,info"
    } else {
        "gbizinfo_mcp=info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// stdout 保留給指令輸出，日誌一律寫到 stderr。
/// `debug` 開啟時改用 JSON 格式，HTTP 診斷紀錄會是單行 JSON。
pub fn init_cli_logger(verbose: bool, debug: bool) {
    let filter = build_filter(verbose || debug);

    if debug {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .json()
                    .flatten_event(true),
            )
            .init();
        return;
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// MCP server 的 stdout 是協定通道，只能寫 stderr
pub fn init_mcp_logger(debug: bool) {
    let filter = build_filter(debug);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json()
                .flatten_event(true),
        )
        .init();
}
