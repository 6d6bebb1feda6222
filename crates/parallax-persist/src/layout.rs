//! Directory layout under the storage root.

pub const LOGS_DIR: &str = "logs";
pub const THREADS_DIR: &str = "threads";
pub const LEGACY_THREADS_DIR: &str = "threadLogs";
pub const CONFIG_DIR: &str = "config";
pub const PROMPTS_DIR: &str = "prompts";
pub const COLLECTIONS_DIR: &str = "collections";
pub const DATA_DIR: &str = "data";

pub const APIS_FILE: &str = "config/apis.json";

pub const JSON_SUFFIX: &str = ".json";

/// Directory holding thread files for the chosen layout
pub fn threads_dir(legacy_layout: bool) -> &'static str {
    if legacy_layout {
        LEGACY_THREADS_DIR
    } else {
        THREADS_DIR
    }
}

/// Every directory created at startup
pub fn all_dirs(legacy_layout: bool) -> [&'static str; 6] {
    [
        LOGS_DIR,
        threads_dir(legacy_layout),
        CONFIG_DIR,
        PROMPTS_DIR,
        COLLECTIONS_DIR,
        DATA_DIR,
    ]
}
