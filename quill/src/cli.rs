use clap::builder::styling::{AnsiColor, Effects, Style, Styles};

/// Run a quill script, or start a REPL when no script is given
#[derive(clap::Parser, Debug, Clone, Default)]
#[clap(name = "quill", version, styles = CARGO_STYLING)]
pub struct Cli {
    pub file: Option<String>,

    /// Do not print diagnostics
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// Read the script from stdin
    #[arg(long, default_value_t = false)]
    pub stdin: bool,

    /// Maximum amount of errors to report
    #[arg(long, value_name = "max-errors", default_value_t = 4)]
    pub max_errors: usize,

    /// Log debug messages to stderr
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

const HEADING: Style = AnsiColor::Green.on_default().effects(Effects::BOLD);
const LITERAL: Style = AnsiColor::Cyan.on_default().effects(Effects::BOLD);
const PLACEHOLDER: Style = AnsiColor::Cyan.on_default();
const ERROR: Style = AnsiColor::Red.on_default().effects(Effects::BOLD);
const INVALID: Style = AnsiColor::Yellow.on_default().effects(Effects::BOLD);

/// Help colours laid out the way `cargo --help` shows them.
const CARGO_STYLING: Styles = Styles::styled()
    .header(HEADING)
    .usage(HEADING)
    .literal(LITERAL)
    .placeholder(PLACEHOLDER)
    .error(ERROR)
    .valid(LITERAL)
    .invalid(INVALID);
