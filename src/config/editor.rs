//! Interactive prompts for `diny init` and first-run setup.

use dialoguer::{Confirm, Select};

use crate::error::ConfigError;

use super::style::{Length, StyleConfig, Tone};

/// What `diny init` should set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitAction {
    ConfigureStyle,
    InstallHook,
}

impl InitAction {
    pub const ALL: [InitAction; 2] = [InitAction::ConfigureStyle, InitAction::InstallHook];

    pub fn label(&self) -> &'static str {
        match self {
            InitAction::ConfigureStyle => "Configure project settings",
            InitAction::InstallHook => "Install git hooks (pre-fill `git commit` messages)",
        }
    }
}

pub fn choose_init_action() -> Result<InitAction, ConfigError> {
    let items: Vec<&str> = InitAction::ALL.iter().map(InitAction::label).collect();
    let index = Select::new()
        .with_prompt("What would you like to set up?")
        .items(&items)
        .default(0)
        .interact()
        .map_err(ConfigError::Interaction)?;
    Ok(InitAction::ALL[index])
}

/// Ask whether to run setup now because no configuration file exists.
pub fn offer_setup() -> Result<bool, ConfigError> {
    Confirm::new()
        .with_prompt("No configuration found. Set it up now?")
        .default(true)
        .interact()
        .map_err(ConfigError::Interaction)
}

/// Walk the user through every style option, starting from `current`.
pub fn edit_style(current: &StyleConfig) -> Result<StyleConfig, ConfigError> {
    let use_emoji = Confirm::new()
        .with_prompt("Use emoji in commit messages?")
        .default(current.use_emoji)
        .interact()
        .map_err(ConfigError::Interaction)?;

    let use_conventional = Confirm::new()
        .with_prompt("Use Conventional Commits format (feat:, fix:, ...)?")
        .default(current.use_conventional)
        .interact()
        .map_err(ConfigError::Interaction)?;

    let tone_items: Vec<&str> = Tone::ALL.iter().map(Tone::description).collect();
    let tone_index = Select::new()
        .with_prompt("Tone")
        .items(&tone_items)
        .default(position(&Tone::ALL, &current.tone))
        .interact()
        .map_err(ConfigError::Interaction)?;

    let length_items: Vec<&str> = Length::ALL.iter().map(Length::description).collect();
    let length_index = Select::new()
        .with_prompt("Length")
        .items(&length_items)
        .default(position(&Length::ALL, &current.length))
        .interact()
        .map_err(ConfigError::Interaction)?;

    Ok(StyleConfig {
        use_emoji,
        use_conventional,
        tone: Tone::ALL[tone_index],
        length: Length::ALL[length_index],
    })
}

fn position<T: PartialEq>(all: &[T], value: &T) -> usize {
    all.iter().position(|v| v == value).unwrap_or(0)
}
