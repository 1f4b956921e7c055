// src/config.rs

/// Default destination for `--save_csv`.
pub const DEFAULT_CSV_PATH: &str = "data.csv";

/// Default destination for `--save_json`.
pub const DEFAULT_JSON_PATH: &str = "data.json";

/// Field delimiter of the CSV export.
pub const CSV_DELIMITER: u8 = b';';

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Sent with every pricing page request.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
