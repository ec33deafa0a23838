use std::{
    error::Error,
    fmt,
    io::{self, Cursor, Read, Seek, SeekFrom, Write},
    panic,
    sync::Mutex,
};

use {
    colored::{ColoredString, Colorize},
    log::{LevelFilter, Record},
    log4rs::{
        append::file::FileAppender,
        config::{Appender, Config, Root},
        encode::{pattern::PatternEncoder, Encode, Write as LogWrite},
        Handle,
    },
};

static DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

lazy_static! {
    static ref PREFIX_FATAL: ColoredString = "fatal".on_bright_red();
    static ref PREFIX_ACCEPT: ColoredString = "ACCEPT".bright_green();
    static ref PREFIX_REJECT: ColoredString = "REJECT".bright_red();
    static ref LOGGER_HANDLE: Mutex<Option<Handle>> = Mutex::new(None);
}

macro_rules! catch_fatal {
    ($body: block, $catch: block) => {
        std::panic::set_hook(Box::new(|info| {
            if !info.payload().is::<$crate::cli::logger::Fatal>() {
                use backtrace::Backtrace;
                let backtrace = Backtrace::new();

                eprintln!("{}", info);
                error!("{}", info);
                eprintln!("{:?}", backtrace);
                error!("{:?}", backtrace);
            }
        }));

        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| $body));
        if let Err(err) = res {
            if err.is::<$crate::cli::logger::Fatal>() {
                $catch

                #[allow(unreachable_code)]
                {
                    let _ = std::panic::take_hook();
                }
            } else {
                std::panic::resume_unwind(err)
            }
        }
    };
}

#[derive(Debug)]
pub enum Fatal {
    Error,
}

impl fmt::Display for Fatal {
    fn fmt(&self, _: &mut fmt::Formatter) -> fmt::Result {
        Ok(())
    }
}

impl Error for Fatal {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

pub fn level_filter(log_level: Option<&str>) -> LevelFilter {
    match log_level {
        Some("error") => LevelFilter::Error,
        Some("warn") => LevelFilter::Warn,
        Some("info") => LevelFilter::Info,
        Some("debug") => LevelFilter::Debug,
        Some("trace") => LevelFilter::Trace,
        _ => DEFAULT_LOG_LEVEL,
    }
}

pub fn init(log_file: Option<&str>, log_level: Option<&str>) {
    if let Some(log_file) = log_file {
        let pattern_encoder = PatternEncoder::new("{d(%Y-%m-%d %H:%M:%S)} {l} - {m}{n}");
        let sanitized_encoder = SanitizedEncoder::wrap(pattern_encoder);

        let file_appender = match FileAppender::builder()
            .encoder(Box::new(sanitized_encoder))
            .build(log_file)
        {
            Ok(file_appender) => file_appender,
            Err(err) => fatal(&format!("Failed to build log file appender: {}", err)),
        };

        let config = match Config::builder()
            .appender(Appender::builder().build("file", Box::new(file_appender)))
            .build(Root::builder().appender("file").build(level_filter(log_level)))
        {
            Ok(config) => config,
            Err(err) => fatal(&format!("Failed to build logger configuration: {}", err)),
        };

        let mut handle_opt = match LOGGER_HANDLE.lock() {
            Ok(handle_opt) => handle_opt,
            Err(err) => fatal(&format!("Logger handle poisoned: {}", err)),
        };

        if handle_opt.is_none() {
            match log4rs::init_config(config) {
                Ok(handle) => {
                    *handle_opt = Some(handle);
                }
                Err(err) => fatal(&format!("Failed to initialize logger: {}", err)),
            }
        } else if let Some(ref handle) = *handle_opt {
            handle.set_config(config);
        }
    }

    info!("Starting earley-forest {}", env!("CARGO_PKG_VERSION"));
}

pub fn fatal(string: &str) -> ! {
    eprintln!("{}: {}", *PREFIX_FATAL, string);
    error!("{}", string);
    panic::panic_any(Fatal::Error);
}

pub fn accept(string: &str) {
    eprintln!("{}| {}", *PREFIX_ACCEPT, string);
    info!("Accepted {}", string);
}

pub fn reject(string: &str) {
    eprintln!("{}| {}", *PREFIX_REJECT, string);
    warn!("{}", string);
}

#[derive(Debug)]
struct SanitizedEncoder {
    encoder: Box<dyn Encode>,
}

impl SanitizedEncoder {
    fn wrap(encoder: impl Encode) -> Self {
        SanitizedEncoder {
            encoder: Box::new(encoder),
        }
    }
}

impl Encode for SanitizedEncoder {
    fn encode(
        &self,
        w: &mut dyn LogWrite,
        record: &Record,
    ) -> Result<(), Box<dyn Error + Sync + Send>> {
        let mut writer = SanitizedLogWriter::new();
        self.encoder.encode(&mut writer, record)?;
        writer.sanitize_write(w)?;
        Ok(())
    }
}

/// Buffers one encoded record so its colour codes can be stripped before it reaches
/// the log file.
struct SanitizedLogWriter {
    cursor: Cursor<Vec<u8>>,
}

impl SanitizedLogWriter {
    fn new() -> Self {
        SanitizedLogWriter {
            cursor: Cursor::new(Vec::new()),
        }
    }

    fn sanitize_write(&mut self, w: &mut dyn LogWrite) -> Result<usize, io::Error> {
        let mut buf = Vec::new();
        self.cursor.seek(SeekFrom::Start(0))?;
        self.cursor.read_to_end(&mut buf)?;

        let sanitized = strip_ansi_escapes::strip(buf)?;
        w.write(&sanitized)
    }
}

impl Write for SanitizedLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.cursor.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.cursor.flush()
    }
}

impl LogWrite for SanitizedLogWriter {}
