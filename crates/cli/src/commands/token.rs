//! Bearer token management.

use clap::Subcommand;
use secrecy::SecretString;

use threadline_portal::Portal;

use super::CliError;

#[derive(Subcommand)]
pub enum TokenAction {
    /// Store a token, read from `THREADLINE_TOKEN`
    Set,
    /// Forget the stored token
    Clear,
}

pub fn run(portal: &Portal, action: TokenAction) -> Result<(), CliError> {
    match action {
        TokenAction::Set => {
            let token = std::env::var("THREADLINE_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty())
                .map(SecretString::from);
            match token {
                Some(token) => {
                    portal.set_token(&token)?;
                    println!("Token stored");
                }
                None => println!("THREADLINE_TOKEN is not set; nothing stored"),
            }
        }
        TokenAction::Clear => {
            portal.api().clear_token()?;
            println!("Token cleared");
        }
    }
    Ok(())
}
