use dotenvy::dotenv;
use link_info_bot::config::Settings;
use link_info_bot::runner::run;
use regex::Regex;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Rewrites Telegram bot tokens out of log text.
///
/// Rules run in order; each later rule sees the output of the earlier ones.
struct TokenRedactor {
    rules: Vec<(Regex, &'static str)>,
}

impl TokenRedactor {
    fn new() -> Result<Self, regex::Error> {
        let rules = [
            // https://api.telegram.org/bot<token>/method
            (r"(https?://[^/]+/bot)[0-9]+:[A-Za-z0-9_-]+", "${1}[TELEGRAM_TOKEN]"),
            (r"\bbot([0-9]{8,10}):[A-Za-z0-9_-]+", "bot${1}:[TELEGRAM_TOKEN]"),
            (r"[0-9]{8,10}:[A-Za-z0-9_-]{35}", "[TELEGRAM_TOKEN]"),
        ];
        let rules = rules
            .into_iter()
            .map(|(pattern, replacement)| Regex::new(pattern).map(|re| (re, replacement)))
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { rules })
    }

    fn redact(&self, line: &str) -> String {
        self.rules
            .iter()
            .fold(line.to_string(), |text, (re, replacement)| {
                re.replace_all(&text, *replacement).into_owned()
            })
    }
}

/// Collects one formatted event and writes it, redacted, when dropped.
///
/// The formatter may split an event over several `write` calls, so nothing
/// reaches `sink` until the whole event is known.
struct RedactedEvent<W: Write> {
    buf: Vec<u8>,
    sink: W,
    redactor: Arc<TokenRedactor>,
}

impl<W: Write> Write for RedactedEvent<W> {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<W: Write> Drop for RedactedEvent<W> {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let text = self.redactor.redact(&String::from_utf8_lossy(&self.buf));
        // Nowhere left to report a failing log sink
        let _ = self.sink.write_all(text.as_bytes());
        let _ = self.sink.flush();
    }
}

/// `MakeWriter` handing each event a [`RedactedEvent`] over stderr.
struct RedactedStderr(Arc<TokenRedactor>);

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for RedactedStderr {
    type Writer = RedactedEvent<io::Stderr>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactedEvent {
            buf: Vec::new(),
            sink: io::stderr(),
            redactor: Arc::clone(&self.0),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenv().ok();

    // Token redaction must exist before the first log line
    let redactor = Arc::new(TokenRedactor::new().map_err(|e| {
        eprintln!("Failed to compile redaction rules: {e}");
        e
    })?);

    init_logging(redactor);

    info!("Starting Link Info Bot...");

    let settings = init_settings();

    if let Err(e) = run(settings).await {
        error!("Startup failed: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(redactor: Arc<TokenRedactor>) {
    let make_writer = RedactedStderr(redactor);

    let debug_mode = std::env::var("DEBUG_MODE")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);

    let filter = if debug_mode {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(
                "link_info_bot=info,teloxide=warn,hyper=warn,h2=error,reqwest=warn,tokio=warn,tower=warn,axum=warn",
            )
        })
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(make_writer))
        .init();
}

fn init_settings() -> Arc<Settings> {
    match Settings::new() {
        Ok(s) => {
            info!("Configuration loaded successfully.");
            Arc::new(s)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    }
}
