use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Local, NaiveDate};
use std::sync::atomic::{AtomicU32, Ordering};
use std::{
    fs::{self, File, OpenOptions},
    io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*, util::SubscriberInitExt};

use crate::config::LoggingConfig;

const LOG_FILE_STEM: &str = "sqlkit";

// 日志时间使用本地时区
pub struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// 共享当前日志文件句柄的写入器
struct SharedFile(Arc<Mutex<File>>);

impl io::Write for SharedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).flush()
    }
}

/// 按本地日期每天切换的日志文件：当天写入 `sqlkit.log`，
/// 跨天后把旧文件改名为 `sqlkit.YYYY-MM-DD.log`
struct DailyFileWriter {
    dir: PathBuf,
    active: Arc<Mutex<File>>,
    day: AtomicU32,
}

impl DailyFileWriter {
    fn new(dir: &str) -> Result<Self> {
        let dir = PathBuf::from(dir);
        fs::create_dir_all(&dir).context(format!("Failed to create log directory: {dir:?}"))?;

        let now = Local::now();
        Self::archive_stale(&dir, &now)?;
        let file = Self::open_current(&dir)?;

        Ok(DailyFileWriter {
            dir,
            active: Arc::new(Mutex::new(file)),
            day: AtomicU32::new(now.ordinal()),
        })
    }

    fn current_path(dir: &Path) -> PathBuf {
        dir.join(format!("{LOG_FILE_STEM}.log"))
    }

    fn archive_path(dir: &Path, date: NaiveDate) -> PathBuf {
        dir.join(format!("{LOG_FILE_STEM}.{}.log", date.format("%Y-%m-%d")))
    }

    fn open_current(dir: &Path) -> Result<File> {
        let path = Self::current_path(dir);
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .context(format!("Failed to open log file: {path:?}"))
    }

    // 当前日志文件最后修改时间早于今天时归档
    fn archive_stale(dir: &Path, now: &DateTime<Local>) -> Result<()> {
        let path = Self::current_path(dir);
        if !path.exists() {
            return Ok(());
        }
        let modified: DateTime<Local> = fs::metadata(&path)
            .and_then(|m| m.modified())
            .context(format!("Failed to read modified time of {path:?}"))?
            .into();
        let modified_date = modified.date_naive();
        if modified_date < now.date_naive() {
            let archive = Self::archive_path(dir, modified_date);
            fs::rename(&path, &archive)
                .context(format!("Failed to archive {path:?} to {archive:?}"))?;
        }
        Ok(())
    }

    fn rotate_if_needed(&self) -> Result<()> {
        let now = Local::now();
        if self.day.load(Ordering::Relaxed) == now.ordinal() {
            return Ok(());
        }
        Self::archive_stale(&self.dir, &now)?;
        let file = Self::open_current(&self.dir)?;
        *self.active.lock().unwrap_or_else(PoisonError::into_inner) = file;
        self.day.store(now.ordinal(), Ordering::Relaxed);
        Ok(())
    }
}

impl<'a> fmt::MakeWriter<'a> for DailyFileWriter {
    type Writer = SharedFile;

    fn make_writer(&self) -> Self::Writer {
        // 切换失败就继续写旧文件，只能报到 stderr
        if let Err(e) = self.rotate_if_needed() {
            eprintln!("[log rotation] keeping previous log file: {e:?}");
        }
        SharedFile(Arc::clone(&self.active))
    }
}

// RUST_LOG 优先，其次是配置里的级别
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// 初始化 tracing 日志：
/// - 控制台输出，带颜色、本地时间、文件名/行号
/// - 配置了 `logging.dir` 时额外写入按天切换的日志文件
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let file_layer = match config.dir.as_deref() {
        Some(dir) => Some(
            fmt::layer()
                .with_ansi(false)
                .with_writer(DailyFileWriter::new(dir)?)
                .with_target(true)
                .with_timer(LocalTimer)
                .with_thread_names(true)
                .with_line_number(true)
                .with_file(true)
                .with_filter(env_filter(&config.level)),
        ),
        None => None,
    };

    let stdout_layer = fmt::layer()
        .with_ansi(true)
        .with_writer(io::stderr) // stdout 留给查询结果
        .with_timer(LocalTimer)
        .with_line_number(true)
        .with_file(true)
        .with_filter(env_filter(&config.level));

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}
