use delivery_desk::config::LoggingConfig;
use delivery_desk::logger::Logger;
use log::{Level, Record};

fn emit(sink: &dyn log::Log, level: Level, message: &str) {
    sink.log(
        &Record::builder()
            .args(format_args!("{}", message))
            .level(level)
            .target("delivery_desk::image")
            .build(),
    );
}

fn buffer_only(logger: &Logger) -> Box<dyn log::Log> {
    let (_, sink) = logger.dispatch(&LoggingConfig::default()).unwrap().into_log();
    sink
}

#[test]
fn test_log_entries_newest_first() {
    let logger = Logger::new();
    let sink = buffer_only(&logger);
    emit(sink.as_ref(), Level::Info, "first");
    emit(sink.as_ref(), Level::Info, "second");

    let logs = logger.get_logs();
    assert_eq!(logs.len(), 2);
    assert!(logs[0].contains("second"));
    assert!(logs[1].contains("first"));

    logger.clear();
    assert!(logger.get_logs().is_empty());
}

#[test]
fn test_buffer_is_bounded() {
    let logger = Logger::with_capacity(3);
    let sink = buffer_only(&logger);
    for i in 0..5 {
        emit(sink.as_ref(), Level::Warn, &format!("line {}", i));
    }

    let logs = logger.get_logs();
    assert_eq!(logs.len(), 3);
    assert!(logs[0].contains("line 4"));
    assert!(logs[2].contains("line 2"));
}

#[test]
fn test_dispatch_feeds_buffer_when_output_disabled() {
    let logger = Logger::new();
    let config = LoggingConfig {
        level: "warn".to_string(),
        ..Default::default()
    };

    let (level, sink) = logger.dispatch(&config).unwrap().into_log();
    assert_eq!(level, log::LevelFilter::Warn);

    emit(sink.as_ref(), Level::Error, "image failed to load");
    emit(sink.as_ref(), Level::Info, "filtered out");

    let logs = logger.get_logs();
    assert_eq!(logs.len(), 1);
    assert!(logs[0].contains("ERROR"));
    assert!(logs[0].contains("delivery_desk::image"));
    assert!(logs[0].contains("image failed to load"));
}

#[test]
fn test_dispatch_writes_log_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("delivery-desk.log");
    let logger = Logger::new();
    let config = LoggingConfig {
        enabled: true,
        level: "info".to_string(),
        file: Some(path.clone()),
    };

    let (_, sink) = logger.dispatch(&config).unwrap().into_log();
    emit(sink.as_ref(), Level::Info, "fetched 3 delivery personnel");
    sink.flush();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("fetched 3 delivery personnel"));
}

#[test]
fn test_dispatch_rejects_bad_level() {
    let config = LoggingConfig {
        level: "chatty".to_string(),
        ..Default::default()
    };
    assert!(Logger::new().dispatch(&config).is_err());
}
