// size formatting, base 1024 all the way up
pub const SIZE_UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];
pub const BYTES_PER_UNIT: f64 = 1024.0;

// time format for report headers
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// log sink layout
pub const LOG_DIR_NAME: &str = "Disk Usage Logs";
pub const LOG_FILE_SUFFIX: &str = " -- Disk Usage Log.txt";

// progress spinner animation
pub const SPINNER_FRAMES: [char; 4] = ['|', '/', '-', '\\'];
pub const SPINNER_TICK_MS: u64 = 100;
