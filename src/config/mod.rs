//! User preferences and runtime settings.

pub mod editor;
pub mod settings;
pub mod store;
pub mod style;

pub use editor::{InitAction, choose_init_action, edit_style, offer_setup};
pub use settings::InferenceSettings;
pub use store::{CONFIG_FILE_NAME, ConfigStore, FileConfigStore};
pub use style::{Length, StyleConfig, Tone};
