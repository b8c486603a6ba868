use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use healthbot_core::{HealthbotConfig, ResponseMode};

#[derive(Parser, Debug)]
#[command(
    name = "healthbot",
    version,
    about = "🏥 HealthBot - symptom lookup and medical reference assistant"
)]
pub struct Cli {
    /// Configuration file (defaults to ./healthbot.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Reply style, overriding the configuration
    #[arg(short, long, value_enum, global = true)]
    pub mode: Option<ModeArg>,

    /// Do not query the web search service
    #[arg(long, global = true)]
    pub no_web: bool,

    /// Print replies at once instead of typing them out
    #[arg(long, global = true)]
    pub no_typing: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Interactive chat session (default)
    Chat,
    /// Answer a single query and exit
    Ask {
        /// Symptoms or question, e.g. "fever, cough"
        query: String,
    },
    /// Manage the persisted document index
    Index {
        #[command(subcommand)]
        action: IndexAction,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexAction {
    /// Re-read the document folder and rebuild the index
    Rebuild,
    /// Show the persisted index
    Status,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Concise,
    Detailed,
}

impl From<ModeArg> for ResponseMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Concise => ResponseMode::Concise,
            ModeArg::Detailed => ResponseMode::Detailed,
        }
    }
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut HealthbotConfig) {
        if let Some(mode) = self.mode {
            config.response.mode = mode.into();
        }
        if self.no_web {
            config.web.enabled = false;
        }
        if self.no_typing {
            config.response.typing_delay_ms = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_chat_without_subcommand() {
        let cli = Cli::try_parse_from(["healthbot"]).unwrap();
        assert_eq!(cli.command, None);
        assert!(!cli.no_web);
    }

    #[test]
    fn parses_ask_with_global_flags() {
        let args = ["healthbot", "ask", "fever, cough", "--mode", "detailed", "--no-web"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.command, Some(Command::Ask { query: "fever, cough".into() }));

        let mut config = HealthbotConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.response.mode, ResponseMode::Detailed);
        assert!(!config.web.enabled);
        assert_eq!(config.response.typing_delay_ms, 10);
    }

    #[test]
    fn parses_index_actions() {
        let cli = Cli::try_parse_from(["healthbot", "index", "rebuild"]).unwrap();
        assert_eq!(cli.command, Some(Command::Index { action: IndexAction::Rebuild }));
        assert!(Cli::try_parse_from(["healthbot", "index", "explode"]).is_err());
    }
}
