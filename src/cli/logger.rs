use indicatif::ProgressBar;
use log::{Level, LevelFilter, Metadata, Record};
use std::sync::{Arc, Mutex};

/// 日志控制器
///
/// 与 logger 共享当前进度条，不依赖全局变量。
/// 需要在 main 中初始化后传递给 runner。
#[derive(Clone, Default)]
pub struct LogController {
    bar: Arc<Mutex<Option<ProgressBar>>>,
}

impl LogController {
    /// 设置进度条，之后的日志通过进度条输出
    pub fn set_progress_bar(&self, progress_bar: ProgressBar) {
        if let Ok(mut bar) = self.bar.lock() {
            *bar = Some(progress_bar);
        }
    }

    /// 清除进度条
    pub fn clear_progress_bar(&self) {
        if let Ok(mut bar) = self.bar.lock() {
            *bar = None;
        }
    }

    fn print(&self, msg: String) {
        match self.bar.lock() {
            Ok(bar) => match bar.as_ref() {
                Some(pb) if !pb.is_finished() => pb.println(msg),
                _ => eprintln!("{}", msg),
            },
            Err(_) => eprintln!("{}", msg),
        }
    }
}

/// 自定义 Logger
///
/// 有活动进度条时通过 `ProgressBar::println` 输出，避免破坏进度条
struct BarAwareLogger {
    ctrl: LogController,
}

impl log::Log for BarAwareLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.ctrl.print(format_record(record.level(), &record.args().to_string()));
    }

    fn flush(&self) {}
}

fn format_record(level: Level, msg: &str) -> String {
    let level_str = match level {
        Level::Error => "\x1b[31m[ERROR]\x1b[0m",
        Level::Warn => "\x1b[33m[WARN]\x1b[0m",
        Level::Info => "\x1b[32m[INFO]\x1b[0m",
        Level::Debug => "\x1b[36m[DEBUG]\x1b[0m",
        Level::Trace => "\x1b[90m[TRACE]\x1b[0m",
    };
    format!("{} {}", level_str, msg)
}

/// 初始化日志系统
///
/// 返回一个 Controller 实例，调用者需要将其传递给需要控制进度条的模块
pub fn init_logger(level: LevelFilter) -> Result<LogController, log::SetLoggerError> {
    let ctrl = LogController::default();
    let logger = BarAwareLogger { ctrl: ctrl.clone() };

    // 使用 Box::leak 将 logger 提升为 'static 生命周期
    log::set_logger(Box::leak(Box::new(logger)))?;
    log::set_max_level(level);

    Ok(ctrl)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_record() {
        assert_eq!(
            format_record(Level::Info, "开始 a.csv"),
            "\x1b[32m[INFO]\x1b[0m 开始 a.csv"
        );
        assert!(format_record(Level::Error, "x").contains("[ERROR]"));
    }

    #[test]
    fn test_controller_set_and_clear() {
        let ctrl = LogController::default();
        ctrl.set_progress_bar(ProgressBar::hidden());
        assert!(ctrl.bar.lock().unwrap().is_some());
        ctrl.clear_progress_bar();
        assert!(ctrl.bar.lock().unwrap().is_none());
    }
}
