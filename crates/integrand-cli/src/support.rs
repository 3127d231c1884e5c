use crate::config::Config;
use integrand_kernel::Provenance;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::Level;

pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub fn load_config_or_exit(explicit: Option<&Path>) -> Config {
    Config::discover(explicit).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

pub fn parse_kinds_or_exit(kinds: &[String]) -> Vec<Provenance> {
    kinds
        .iter()
        .map(|kind| {
            kind.parse().unwrap_or_else(|e| {
                eprintln!("error: {e}");
                std::process::exit(1);
            })
        })
        .collect()
}

pub fn print_json_or_exit<T: Serialize>(payload: &T) {
    let rendered = serde_json::to_string_pretty(payload).unwrap_or_else(|err| {
        eprintln!("error: failed to render json payload: {err}");
        std::process::exit(2);
    });
    println!("{rendered}");
}

pub fn write_file_or_exit(path: &Path, contents: &str) {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).unwrap_or_else(|e| {
            eprintln!("error: failed to create {}: {e}", parent.display());
            std::process::exit(1);
        });
    }
    fs::write(path, contents).unwrap_or_else(|e| {
        eprintln!("error: failed to write {}: {e}", path.display());
        std::process::exit(1);
    });
}
