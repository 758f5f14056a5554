//! Interactive operator session.
//!
//! A small state machine: every [`Session::step`] shows one screen, performs
//! at most one bot request, and returns the next state. Recoverable errors
//! (unknown bot, remote failure) are printed on one line and the session
//! goes back to the bot's action menu. Prompt I/O failures end the session.

use chrono::Utc;
use tracing::{debug, info};

use super::output;
use super::prompt::Prompter;
use super::render;
use crate::application::dispatch::Dispatcher;
use crate::domain::bot::BotKey;
use crate::domain::error::DomainError;
use crate::domain::request::{
    normalize_symbol, BotStartRequest, Interval, PositiveAmount, TradeWindow, SUGGESTED_SYMBOLS,
};
use crate::domain::status::StatusesResponse;
use crate::error::{DispatchError, Result};
use crate::port::outbound::bot::BotTransport;

/// Title shown above the main menu.
pub const WELCOME: &str = "Welcome to the Central CLI for Bots!";

/// Last menu entry of the symbol picker.
pub const MANUAL_SYMBOL: &str = "Other (enter manually)";

const ACTIONS: [&str; 4] = [
    "Start Bot",
    "Stop Bot",
    "Get Bot Statuses",
    "Back to Main Menu",
];

/// Where the operator currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    MainMenu,
    ActionMenu(BotKey),
    AwaitingStartInput(BotKey),
    AwaitingStopTarget(BotKey),
    DisplayingStatus(BotKey),
}

/// Console session over a prompter and a dispatcher.
pub struct Session<P, T> {
    prompter: P,
    dispatcher: Dispatcher<T>,
}

impl<P: Prompter, T: BotTransport> Session<P, T> {
    #[must_use]
    pub fn new(prompter: P, dispatcher: Dispatcher<T>) -> Self {
        Self {
            prompter,
            dispatcher,
        }
    }

    #[must_use]
    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }

    /// Run from the main menu until the operator exits.
    ///
    /// # Errors
    /// Returns an error if reading operator input fails.
    pub async fn run(&mut self) -> Result<()> {
        let mut state = SessionState::MainMenu;
        while let Some(next) = self.step(state).await? {
            debug!(state = ?next, "Session transition");
            state = next;
        }
        info!("Session ended");
        Ok(())
    }

    /// Handle one state; `None` means the session is over.
    ///
    /// # Errors
    /// Returns an error if reading operator input fails.
    pub async fn step(&mut self, state: SessionState) -> Result<Option<SessionState>> {
        match state {
            SessionState::MainMenu => self.main_menu(),
            SessionState::ActionMenu(key) => self.action_menu(key),
            SessionState::AwaitingStartInput(key) => self.start(key).await,
            SessionState::AwaitingStopTarget(key) => self.stop(key).await,
            SessionState::DisplayingStatus(key) => self.statuses(key).await,
        }
    }

    fn main_menu(&mut self) -> Result<Option<SessionState>> {
        output::clear();
        output::section(WELCOME);

        let keys: Vec<BotKey> = self
            .dispatcher
            .registry()
            .iter()
            .map(|(key, _)| key.clone())
            .collect();
        let mut items: Vec<String> = self
            .dispatcher
            .registry()
            .iter()
            .map(|(_, bot)| {
                if bot.description.is_empty() {
                    bot.name.clone()
                } else {
                    format!("{} - {}", bot.name, output::muted(&bot.description))
                }
            })
            .collect();
        items.push("Exit".to_string());

        let choice = self.prompter.select("Select a bot to manage", &items, 0)?;
        match keys.get(choice) {
            Some(key) => Ok(Some(SessionState::ActionMenu(key.clone()))),
            None => {
                output::success("Goodbye!");
                Ok(None)
            }
        }
    }

    fn action_menu(&mut self, key: BotKey) -> Result<Option<SessionState>> {
        let Some(name) = self.bot_name(&key) else {
            output::error(&format!("Bot \"{key}\" not found in configuration."));
            return Ok(Some(SessionState::MainMenu));
        };

        output::clear();
        output::section(&format!("Managing: {name}"));

        let items: Vec<String> = ACTIONS.iter().map(ToString::to_string).collect();
        let choice = self
            .prompter
            .select(&format!("Choose an action for {name}"), &items, 0)?;

        Ok(Some(match choice {
            0 => SessionState::AwaitingStartInput(key),
            1 => SessionState::AwaitingStopTarget(key),
            2 => SessionState::DisplayingStatus(key),
            _ => SessionState::MainMenu,
        }))
    }

    async fn start(&mut self, key: BotKey) -> Result<Option<SessionState>> {
        let request = self.start_inputs()?;
        info!(
            bot = %key,
            symbol = %request.symbol,
            interval = %request.interval,
            trade_window = %request.trade_window,
            "Starting bot"
        );

        let pb = output::spinner("Starting bot...");
        let result = self.dispatcher.start(key.as_str(), request).await;
        output::spinner_clear(&pb);

        match result {
            Ok(response) => match response.message {
                Some(message) => output::success(&message),
                None => output::success("Start request accepted"),
            },
            Err(e) => output::error(&e.to_string()),
        }

        self.back_to(key)
    }

    async fn stop(&mut self, key: BotKey) -> Result<Option<SessionState>> {
        let statuses = match self.fetch_statuses(&key).await {
            Ok(statuses) => statuses,
            Err(e) => {
                output::error(&e.to_string());
                return self.back_to(key);
            }
        };

        if statuses.running_bots.is_empty() {
            output::warning("No bots are currently running.");
            return self.back_to(key);
        }

        let mut items: Vec<String> = statuses.running_bots.iter().map(|b| b.label()).collect();
        items.push("Cancel".to_string());
        let choice = self.prompter.select("Select a bot to stop", &items, 0)?;

        if let Some(target) = statuses.running_bots.get(choice) {
            let pb = output::spinner(&format!("Stopping {}...", target.bot_name));
            let result = self.dispatcher.stop(key.as_str(), &target.bot_name).await;
            output::spinner_clear(&pb);

            match result {
                Ok(_) => {
                    info!(bot = %key, instance = %target.bot_name, "Bot stopped");
                    output::success(&format!("Successfully stopped bot: {}", target.bot_name));
                }
                Err(e) => output::error(&e.to_string()),
            }
        }

        self.back_to(key)
    }

    async fn statuses(&mut self, key: BotKey) -> Result<Option<SessionState>> {
        match self.fetch_statuses(&key).await {
            Ok(statuses) => {
                let name = self.bot_name(&key).unwrap_or_else(|| key.to_string());
                render::print_statuses(&name, &statuses, Utc::now());
            }
            Err(e) => output::error(&e.to_string()),
        }
        self.back_to(key)
    }

    async fn fetch_statuses(
        &self,
        key: &BotKey,
    ) -> std::result::Result<StatusesResponse, DispatchError> {
        let pb = output::spinner("Fetching bot statuses...");
        let result = self.dispatcher.statuses(key.as_str()).await;
        output::spinner_clear(&pb);
        result
    }

    fn back_to(&mut self, key: BotKey) -> Result<Option<SessionState>> {
        self.prompter.pause()?;
        Ok(Some(SessionState::ActionMenu(key)))
    }

    fn bot_name(&self, key: &BotKey) -> Option<String> {
        self.dispatcher.registry().get(key).map(|bot| bot.name.clone())
    }

    fn start_inputs(&mut self) -> Result<BotStartRequest> {
        let symbol = self.symbol()?;

        let intervals: Vec<String> = Interval::ALL.iter().map(ToString::to_string).collect();
        let default_interval = Interval::ALL
            .iter()
            .position(|i| *i == Interval::default())
            .unwrap_or(0);
        let choice = self
            .prompter
            .select("Choose the trading interval", &intervals, default_interval)?;
        let interval = Interval::ALL.get(choice).copied().unwrap_or_default();

        let starting_trade_amount = self.amount(
            "Enter the trade amount (USDT)",
            "1000",
            "starting_trade_amount",
            "Trade amount must be a positive number.",
        )?;
        let trade_allocation = self.amount(
            "Enter the trade allocation percentage (%)",
            "10",
            "trade_allocation",
            "Percentage must be a positive number.",
        )?;

        let windows: Vec<String> = TradeWindow::CHOICES.iter().map(|w| w.label()).collect();
        let choice = self
            .prompter
            .select("Choose how long the bot should trade", &windows, 0)?;
        let trade_window = TradeWindow::CHOICES.get(choice).copied().unwrap_or_default();

        Ok(BotStartRequest {
            symbol,
            interval,
            starting_trade_amount,
            trade_allocation,
            trade_window,
        })
    }

    fn symbol(&mut self) -> Result<String> {
        let mut items: Vec<String> = SUGGESTED_SYMBOLS.iter().map(ToString::to_string).collect();
        items.push(MANUAL_SYMBOL.to_string());

        let choice = self.prompter.select("Select the trading pair", &items, 0)?;
        if let Some(symbol) = SUGGESTED_SYMBOLS.get(choice) {
            return Ok((*symbol).to_string());
        }

        loop {
            let raw = self
                .prompter
                .input("Enter the trading pair (e.g., BTCUSDT)", "")?;
            match normalize_symbol(&raw) {
                Ok(symbol) => return Ok(symbol),
                Err(e) => output::error(&e.to_string()),
            }
        }
    }

    fn amount(
        &mut self,
        prompt: &str,
        default: &str,
        field: &'static str,
        hint: &str,
    ) -> Result<PositiveAmount> {
        loop {
            let raw = self.prompter.input(prompt, default)?;
            match PositiveAmount::parse(field, &raw) {
                Ok(amount) => return Ok(amount),
                Err(e @ DomainError::OutOfRange { .. }) => output::error(&e.to_string()),
                Err(e) => {
                    debug!(error = %e, "Rejected amount");
                    output::error(hint);
                }
            }
        }
    }
}
