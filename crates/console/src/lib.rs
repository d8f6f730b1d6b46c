//! Interactive console for the JSON log demo server.
//!
//! [`Console`] reacts to [`UiEvent`]s by calling the server through a
//! [`joblog_client::LogService`] and updating a [`ConsoleView`].

pub mod config;
pub mod console;
pub mod error;
pub mod events;
pub mod repeating;
pub mod terminal;
pub mod toast;
pub mod view;

pub use console::{Console, AUTO_REFRESH_PERIOD};
pub use error::ConsoleError;
pub use events::{EventSource, UiEvent};
pub use view::ConsoleView;
