use std::str::FromStr;

/// Route test logs through the fmt subscriber; `SIMPLEKUBE_LOG` picks the filter.
pub fn init_tracing() {
    let env = std::env::var("SIMPLEKUBE_LOG").unwrap_or_else(|_| "warn".to_string());
    let filter = tracing_subscriber::EnvFilter::from_str(&env)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
}
