//! Terminal viewer built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus, diagnostic selection
//! - **[`panes`]**: render functions for each visible pane (source, module tree,
//!   diagnostics, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with a parsed
//! [`Module`], its diagnostics and the source text, then call [`App::run`].
//! The module does not have to be valid; the viewer is most useful on files
//! that failed to parse.
//!
//! [`Module`]: crate::parser::module::Module
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
