use super::Parser;

#[derive(Parser, Debug)]
#[command(about = "Auth gateway for the huddle chat client")]
pub struct Cli {
    /// Path to a settings file, without or with its extension.
    #[arg(long)]
    pub settings: Option<String>,
}
