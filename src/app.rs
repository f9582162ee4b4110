use crate::backend::Backend;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::events::network::{Event as NetworkEvent, Handler as NetworkEventHandler};
use crate::events::terminal::Handler as TerminalEventHandler;
use crate::logger::StateLogger;
use crate::state::State;
use crate::ui::Theme;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::*;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::stdout;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use tokio::sync::Mutex;

pub type NetworkEventSender = Sender<NetworkEvent>;
type NetworkEventReceiver = Receiver<NetworkEvent>;

/// Configuration changes requested by the state.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigUpdate {
    RememberedUsername(Option<String>),
}

pub type ConfigSaveSender = Sender<ConfigUpdate>;
type ConfigSaveReceiver = Receiver<ConfigUpdate>;

/// Oversees event processing, state management, and terminal output.
///
pub struct App {
    state: Arc<Mutex<State>>,
    config: Config,
}

impl App {
    /// Start a new application according to the given configuration. Returns
    /// the result of the application execution.
    ///
    pub async fn start(config: Config) -> AppResult<()> {
        let (log_tx, log_rx) = mpsc::channel::<String>();
        install_logger(&config, log_tx)?;

        info!("Starting application against {}...", config.base_url);
        let (tx, rx) = mpsc::channel::<NetworkEvent>();
        let (config_save_tx, config_save_rx) = mpsc::channel::<ConfigUpdate>();
        let mut state = State::new(tx, config_save_tx, config.remembered_username.clone());
        match Theme::from_name(&config.theme_name) {
            Some(theme) => {
                state.set_theme(theme);
            }
            None => warn!(
                "Unknown theme '{}', using the default. Available: {}",
                config.theme_name,
                Theme::available_themes().join(", ")
            ),
        }
        let app = App {
            state: Arc::new(Mutex::new(state)),
            config,
        };
        app.start_network(rx)?;
        app.start_config_saver(config_save_rx);
        let result = app.start_ui(log_rx).await;

        info!("Exiting application...");
        result
    }

    /// Start a thread applying config updates to the stored file. Command
    /// line overrides on the running config are not written back.
    ///
    fn start_config_saver(&self, receiver: ConfigSaveReceiver) {
        let config = self.config.clone();
        std::thread::spawn(move || {
            while let Ok(update) = receiver.recv() {
                let result = config.persisted().and_then(|mut stored| {
                    apply_update(&mut stored, update);
                    stored.save()
                });
                if let Err(e) = result {
                    error!("Failed to save config: {}", e);
                }
            }
        });
    }

    /// Start a separate thread for asynchronous state mutations.
    ///
    fn start_network(&self, net_receiver: NetworkEventReceiver) -> AppResult<()> {
        debug!("Creating new thread for asynchronous networking...");
        let backend = Backend::new(&self.config.base_url)?;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| AppError::RuntimeCreation(e.to_string()))?;
        let cloned_state = Arc::clone(&self.state);
        let export_dir = self.config.export_dir.clone();
        std::thread::spawn(move || {
            runtime.block_on(async {
                let mut network_event_handler =
                    NetworkEventHandler::new(&cloned_state, &backend, export_dir);
                while let Ok(network_event) = net_receiver.recv() {
                    if let Err(e) = network_event_handler.handle(network_event).await {
                        error!("Failed to handle network event: {}", e);
                    }
                }
            })
        });
        Ok(())
    }

    /// Begin the terminal event poll on a separate thread before starting the
    /// render loop on the main thread. Return the result following an exit
    /// request or unrecoverable error.
    ///
    async fn start_ui(&self, log_rx: Receiver<String>) -> AppResult<()> {
        debug!("Starting user interface on main thread...");
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        enable_raw_mode()?;

        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;

        let result = self.run_loop(&mut terminal, &log_rx).await;

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        result
    }

    async fn run_loop(
        &self,
        terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
        log_rx: &Receiver<String>,
    ) -> AppResult<()> {
        let terminal_event_handler = TerminalEventHandler::new();
        loop {
            let mut state = self.state.lock().await;
            for entry in log_rx.try_iter() {
                state.add_log_entry(entry);
            }
            if let Ok(size) = terminal.size() {
                state.set_terminal_size(size);
            }
            terminal.draw(|frame| crate::ui::render(frame, &mut state))?;
            let keep_running = terminal_event_handler
                .handle_next(&mut state)
                .map_err(|e| AppError::Terminal(e.to_string()))?;
            if !keep_running {
                debug!("Received application exit request.");
                return Ok(());
            }
        }
    }
}

/// Install the global logger at the configured level, forwarding formatted
/// records to the UI loop.
///
fn install_logger(config: &Config, log_tx: Sender<String>) -> AppResult<()> {
    let level = config.level_filter()?;
    let logger = StateLogger::new(level);
    let log_tx = std::sync::Mutex::new(log_tx);
    logger.set_log_callback(Box::new(move |line| {
        if let Ok(tx) = log_tx.lock() {
            let _ = tx.send(line);
        }
    }));
    log::set_boxed_logger(Box::new(logger)).map_err(|e| AppError::Logger(e.to_string()))?;
    log::set_max_level(level);
    Ok(())
}

fn apply_update(config: &mut Config, update: ConfigUpdate) {
    match update {
        ConfigUpdate::RememberedUsername(username) => {
            debug!("Saving remembered username: {:?}", username);
            config.remembered_username = username;
        }
    }
}
