//! Sign&Go TUI - courier tracking terminal client
//!
//! Search bookings, follow them on a route map, capture delivery signatures
//! and report incidents against the Sign&Go courier API.

use std::fs::{self, OpenOptions};
use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use signgo_core::{Coordinates, FixedLocation, Geocoder, HttpBookingApi, NoGeocoder, NominatimGeocoder};
use signgo_tui::app::{App, ClientConfig};
use tracing::Subscriber;
use tracing_subscriber::{fmt, fmt::MakeWriter, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "signgo-tui")]
#[command(about = "Track courier bookings, capture signatures and report incidents", long_about = None)]
#[command(version)]
struct Cli {
    /// Booking API base URL (overrides the config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Your latitude, used for distances and the map
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Your longitude
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lng: Option<f64>,

    /// Read configuration from this file instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded config
    fn apply(&self, config: &mut ClientConfig) {
        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if let (Some(lat), Some(lng)) = (self.lat, self.lng) {
            config.user_location = Some(Coordinates::new(lat, lng));
        }
    }

    fn log_filter(&self) -> &'static str {
        if self.verbose {
            "signgo_tui=debug,signgo_core=debug"
        } else {
            "signgo_tui=info,signgo_core=info"
        }
    }
}

/// Application entry point with panic handling for terminal restoration
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Before loading config so parse warnings reach the log
    init_logging(cli.log_filter())?;

    let config = load_config(&cli);

    // Restore the terminal before the default hook prints
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let api = Arc::new(HttpBookingApi::new(config.base_url.clone(), config.timeout())?);
    tracing::info!(base_url = %api.base_url(), mode = ?config.incident_mode, "starting");

    let geocoder: Arc<dyn Geocoder> = match &config.geocoder_url {
        Some(url) => Arc::new(NominatimGeocoder::new(url.clone(), config.timeout())?),
        None => Arc::new(NoGeocoder),
    };
    let location = FixedLocation(config.user_location);
    let app = App::new(config, api, geocoder, &location);

    let result = run_app(app).await;
    if let Err(e) = &result {
        tracing::error!("Application error: {}", e);
    }

    result
}

/// Config from `--config` or the default location, with flags applied
fn load_config(cli: &Cli) -> ClientConfig {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::load_from(path),
        None => ClientConfig::load(),
    };
    cli.apply(&mut config);
    config
}

fn subscriber<W>(default_filter: &str, writer: W) -> Result<impl Subscriber + Send + Sync + 'static>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?;

    Ok(tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer),
        )
        .with(filter))
}

/// Log to a file next to the config so the UI is left alone
fn init_logging(default_filter: &str) -> Result<()> {
    let writer: Box<dyn io::Write + Send> = match ClientConfig::log_file_path() {
        Some(path) => {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)?;
            }
            Box::new(OpenOptions::new().create(true).append(true).open(path)?)
        }
        None => Box::new(io::sink()),
    };

    subscriber(default_filter, Mutex::new(writer))?.init();
    Ok(())
}

/// Set up the terminal, run the event loop, restore the terminal
async fn run_app(mut app: App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::try_parse_from([
            "signgo-tui",
            "--base-url",
            "https://couriers.example.ph",
            "--lat",
            "10.3157",
            "--lng",
            "123.8854",
            "-v",
        ])
        .unwrap();

        let mut config = ClientConfig::default();
        cli.apply(&mut config);

        assert_eq!(config.base_url, "https://couriers.example.ph");
        assert_eq!(config.user_location, Some(Coordinates::new(10.3157, 123.8854)));
        assert_eq!(cli.log_filter(), "signgo_tui=debug,signgo_core=debug");
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_corrupt_config_warning_is_logged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        let cli = Cli::try_parse_from(["signgo-tui", "--config", path.to_str().unwrap()]).unwrap();

        let captured = Captured::default();
        let sink = captured.clone();
        let subscriber = subscriber(cli.log_filter(), move || sink.clone()).unwrap();
        let config = tracing::subscriber::with_default(subscriber, || load_config(&cli));

        assert_eq!(config, ClientConfig::default());
        let log = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(log.contains("Failed to parse config file"), "log was: {}", log);
    }

    #[test]
    fn test_lat_requires_lng() {
        assert!(Cli::try_parse_from(["signgo-tui", "--lat", "14.6"]).is_err());
    }

    #[test]
    fn test_no_flags_keep_config() {
        let cli = Cli::try_parse_from(["signgo-tui"]).unwrap();
        let mut config = ClientConfig::default();
        cli.apply(&mut config);

        assert_eq!(config, ClientConfig::default());
        assert_eq!(cli.log_filter(), "signgo_tui=info,signgo_core=info");
    }
}
