pub mod history;
pub mod session;
pub mod store;

pub use history::{render_history, NO_HISTORY};
pub use session::{Exchange, HISTORY_WINDOW, MAX_EXCHANGES_PER_SESSION};
pub use store::{SessionStore, MAX_SESSIONS};

#[cfg(test)]
mod tests;
