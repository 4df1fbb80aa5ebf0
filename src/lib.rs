// Terminal browser for TAU's Moodle courses and IMS grades.
// The binary wires these modules together; tests drive them with fakes.

pub mod app;
pub mod backend;
pub mod cache;
pub mod config;
pub mod credentials;
pub mod error;
pub mod ims;
pub mod loader;
pub mod logging;
pub mod moodle;
pub mod state;
pub mod ui;

pub use app::App;
pub use error::{Result, TauError};
