use crate::api::Api;
use crate::board::BoardController;
use crate::config::Config;
use crate::events::network::{Event as NetworkEvent, Handler as NetworkEventHandler};
use crate::events::terminal::Handler as TerminalEventHandler;
use crate::logger::LogBuffer;
use crate::state::State;
use crate::ui::Theme;
use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::*;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout, Stdout};
use std::sync::Arc;
use tokio::sync::Mutex;

pub type NetworkEventSender = std::sync::mpsc::Sender<NetworkEvent>;
type NetworkEventReceiver = std::sync::mpsc::Receiver<NetworkEvent>;

/// Oversees event processing, state management, and terminal output for
/// one board view.
///
pub struct App {
    state: Arc<Mutex<State>>,
    controller: BoardController,
}

impl App {
    /// Open the board view for `board_id` according to the given
    /// configuration. Returns the result of the application execution.
    ///
    pub async fn start(config: &Config, api: Api, board_id: &str, logs: LogBuffer) -> Result<()> {
        info!("Starting board view for {}...", board_id);
        let theme = Theme::from_name(&config.theme_name).unwrap_or_else(|| {
            warn!("Unknown theme '{}', using default", config.theme_name);
            Theme::default()
        });
        let (tx, rx) = std::sync::mpsc::channel::<NetworkEvent>();
        let controller = BoardController::new(api, board_id)
            .with_reload_delay(config.silent_reload_delay());
        let app = App {
            state: Arc::new(Mutex::new(State::new(
                tx.clone(),
                logs,
                theme,
                config.search_debounce(),
            ))),
            controller,
        };
        app.start_network(rx)?;
        let result = app.start_ui(&tx).await;

        if let Err(e) = tx.send(NetworkEvent::Unmount) {
            debug!("Network thread already gone: {}", e);
        }
        info!("Exiting application...");
        result
    }

    /// Start a separate thread for asynchronous state mutations. Each event
    /// is handled on its own task so a slow request does not hold up the rest.
    ///
    fn start_network(&self, net_receiver: NetworkEventReceiver) -> Result<()> {
        debug!("Creating new thread for asynchronous networking...");
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let handler = NetworkEventHandler::new(Arc::clone(&self.state), self.controller.clone());
        std::thread::spawn(move || {
            runtime.block_on(async {
                while let Ok(network_event) = net_receiver.recv() {
                    if let NetworkEvent::Unmount = network_event {
                        if let Err(e) = handler.handle(network_event).await {
                            error!("Failed to handle network event: {}", e);
                        }
                        break;
                    }
                    let handler = handler.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handler.handle(network_event).await {
                            error!("Failed to handle network event: {}", e);
                        }
                    });
                }
            })
        });
        Ok(())
    }

    /// Begin the terminal event poll on a separate thread before starting the
    /// render loop on the main thread. The terminal is restored even when the
    /// loop fails.
    ///
    async fn start_ui(&self, net_sender: &NetworkEventSender) -> Result<()> {
        debug!("Starting user interface on main thread...");
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        enable_raw_mode()?;

        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;

        net_sender.send(NetworkEvent::LoadBoard)?;
        net_sender.send(NetworkEvent::FetchUsers)?;

        let result = self.render_loop(&mut terminal).await;

        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        result
    }

    async fn render_loop(&self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let terminal_event_handler = TerminalEventHandler::new();
        loop {
            let snapshot = self.controller.snapshot().await;
            let mut state = self.state.lock().await;
            state.set_board_snapshot(snapshot);
            if let Ok(size) = terminal.size() {
                state.set_terminal_size(size);
            };
            terminal.draw(|frame| crate::ui::render(frame, &mut state))?;
            if !terminal_event_handler.handle_next(&mut state)? {
                debug!("Received application exit request.");
                break;
            }
        }
        Ok(())
    }
}
