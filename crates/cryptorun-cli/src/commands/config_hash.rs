use cryptorun_schemas::ExitCode;

/// Load + merge layered config, print its canonical hash and JSON.
pub fn run(paths: &[String]) -> i32 {
    let path_refs: Vec<&str> = paths.iter().map(String::as_str).collect();

    match cryptorun_config::load_layered_yaml(&path_refs) {
        Ok(loaded) => {
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
            ExitCode::Success as i32
        }
        Err(err) => {
            tracing::error!(error = %err, "config load failed");
            ExitCode::ConfigError as i32
        }
    }
}
