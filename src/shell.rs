//! Line-oriented front end: header, gated pages and form commands.
//!
//! DESIGN
//! ======
//! `Shell` plays the part of the router. It keeps the current location,
//! consults the `RouteGate` on every navigation, follows redirects, and
//! renders a text screen. Commands stand in for form submissions and header
//! clicks, and call straight into the shared `SessionStore`.

use std::fmt::Write;
use std::sync::Arc;

use crate::gate::{GateDecision, Route, RouteGate};
use crate::principal::{LoginCredentials, Registration};
use crate::session::{AuthOutcome, SessionStore};

/// Upper bound on chained redirects followed by one navigation.
const MAX_REDIRECTS: usize = 4;

pub const HELP: &str = "\
commands:
  login <email> <password>
  register <name> <email> <password> <confirm>
  logout
  goto <path>        (/, /profile, /login, /register)
  whoami
  help
  quit";

// =============================================================================
// COMMANDS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login(String, String),
    Register { name: String, email: String, password: String, password_confirm: String },
    Logout,
    Goto(String),
    Whoami,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShellError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

/// Parse one input line into a command.
///
/// # Errors
///
/// Returns a [`ShellError`] for blank input, unknown verbs, or a wrong
/// number of arguments.
pub fn parse_command(line: &str) -> Result<Command, ShellError> {
    let mut words = line.split_whitespace();
    let verb = words.next().ok_or(ShellError::Empty)?;
    let args: Vec<&str> = words.collect();

    match (verb, args.as_slice()) {
        ("login", [email, password]) => Ok(Command::Login((*email).to_owned(), (*password).to_owned())),
        ("login", _) => Err(ShellError::Usage("login <email> <password>")),
        ("register", [name, email, password, confirm]) => Ok(Command::Register {
            name: (*name).to_owned(),
            email: (*email).to_owned(),
            password: (*password).to_owned(),
            password_confirm: (*confirm).to_owned(),
        }),
        ("register", _) => Err(ShellError::Usage("register <name> <email> <password> <confirm>")),
        ("logout", []) => Ok(Command::Logout),
        ("goto", [path]) => Ok(Command::Goto((*path).to_owned())),
        ("goto", _) => Err(ShellError::Usage("goto <path>")),
        ("whoami", []) => Ok(Command::Whoami),
        ("help", _) => Ok(Command::Help),
        ("quit" | "exit", []) => Ok(Command::Quit),
        (other, _) => Err(ShellError::Unknown(other.to_owned())),
    }
}

/// What the input loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue(Option<String>),
    Quit,
}

// =============================================================================
// SHELL
// =============================================================================

pub struct Shell {
    store: Arc<SessionStore>,
    gate: RouteGate,
    location: Route,
}

impl Shell {
    #[must_use]
    pub fn new(store: Arc<SessionStore>) -> Self {
        let gate = RouteGate::new(store.subscribe());
        Self { store, gate, location: Route::Home }
    }

    #[must_use]
    pub fn location(&self) -> Route {
        self.location
    }

    /// Wait for the startup session check, then settle the location.
    pub async fn wait_ready(&mut self) {
        self.gate.settled(self.location).await;
        self.navigate_to(self.location);
    }

    /// Move to `route`, following gate redirects.
    pub fn navigate_to(&mut self, route: Route) {
        self.location = route;
        for _ in 0..MAX_REDIRECTS {
            match self.gate.check(self.location) {
                GateDecision::Redirect(next) => {
                    tracing::debug!(from = self.location.path(), to = next.path(), "gate redirect");
                    self.location = next;
                }
                GateDecision::Render(_) | GateDecision::Placeholder => return,
            }
        }
        tracing::warn!(location = self.location.path(), "redirect limit reached");
    }

    pub async fn execute(&mut self, command: Command) -> Flow {
        let message = match command {
            Command::Quit => return Flow::Quit,
            Command::Help => Some(HELP.to_owned()),
            Command::Whoami => Some(match self.store.principal() {
                Some(p) => format!("{} <{}> ({})", p.name, p.email, p.id),
                None => "not signed in".to_owned(),
            }),
            Command::Goto(path) => match Route::from_path(&path) {
                Some(route) => {
                    self.navigate_to(route);
                    None
                }
                None => Some(format!("page not found: {path}")),
            },
            Command::Logout => {
                let next = self.store.logout().await;
                self.navigate_to(next);
                Some("signed out".to_owned())
            }
            Command::Login(_, _) | Command::Register { .. } if self.store.is_loading() => {
                Some("still working on the previous request".to_owned())
            }
            Command::Login(email, password) => {
                let outcome = self.store.login(&LoginCredentials::new(email, password)).await;
                Some(self.follow(&outcome, "login"))
            }
            Command::Register { name, email, password, password_confirm } => {
                let registration = Registration::new(name, email, password, password_confirm);
                match self.store.register(&registration).await {
                    Ok(outcome) => Some(self.follow(&outcome, "registration")),
                    Err(e) => Some(e.to_string()),
                }
            }
        };
        Flow::Continue(message)
    }

    fn follow(&mut self, outcome: &AuthOutcome, action: &str) -> String {
        if let Some(next) = outcome.redirect() {
            self.navigate_to(next);
        }
        match outcome {
            AuthOutcome::SignedIn(p) => format!("signed in as {}", p.name),
            AuthOutcome::Failed(e) => format!("{action} failed: {e}"),
        }
    }

    /// Render the header and the gated page at the current location.
    ///
    /// While the store is loading only the placeholder is shown, header
    /// included.
    #[must_use]
    pub fn render(&self) -> String {
        let state = self.store.snapshot();
        if state.loading {
            return "Loading...".to_owned();
        }
        let mut out = String::new();

        let links = if state.is_signed_in() { "Home | Profile | [Logout]" } else { "[Login]" };
        let _ = writeln!(out, "LOGO    {links}");
        let _ = writeln!(out, "---- {} ----", self.location.path());

        match self.gate.check(self.location) {
            GateDecision::Placeholder => out.push_str("Loading..."),
            GateDecision::Redirect(next) => {
                let _ = write!(out, "Redirecting to {}...", next.path());
            }
            GateDecision::Render(Route::Home) => {
                let name = state.principal.as_ref().map_or("", |p| p.name.as_str());
                let _ = write!(out, "Home\nWelcome, {name}.");
            }
            GateDecision::Render(Route::Profile) => {
                if let Some(p) = &state.principal {
                    let _ = write!(out, "Profile\nName:  {}\nEmail: {}\nId:    {}", p.name, p.email, p.id);
                }
            }
            GateDecision::Render(Route::Login) => {
                out.push_str("Login\n  login <email> <password>\nDon't have an account? goto /register");
            }
            GateDecision::Render(Route::Register) => {
                out.push_str(
                    "Register\n  register <name> <email> <password> <confirm>\nAlready have an account? goto /login",
                );
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "shell_test.rs"]
mod tests;
