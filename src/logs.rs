use std::path::Path;

use anyhow::Result;
use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};

/// Logs to a rolling file under `log_dir` and to stderr. Can only be called
/// once per process.
pub fn init(log_dir: &str, level: LevelFilter) -> Result<()> {
    let path = Path::new(log_dir).join("tripbreaker.log");
    let log = FileRotate::new(
        path,
        AppendTimestamp::default(FileLimit::MaxFiles(3)),
        ContentLimit::Lines(1000),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    let config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let loggers: Vec<Box<dyn SharedLogger>> = vec![
        WriteLogger::new(level, config.clone(), log),
        TermLogger::new(level, config, TerminalMode::Stderr, ColorChoice::Auto),
    ];
    CombinedLogger::init(loggers)?;
    Ok(())
}
