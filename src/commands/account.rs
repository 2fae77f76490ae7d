use anyhow::Result;

use super::CommandRunner;
use crate::cli;
use crate::error::TrackerError;
use crate::prompt;
use crate::tracker::Tracker;

pub async fn sign_in(tracker: &mut Tracker, username: &str, password: Option<&str>) -> Result<()> {
    let password = prompt::password_or_prompt(password, "Password")?;
    tracker.sign_in(username, &password)?;
    log::info!("signed in as {}", username.trim());
    tracker.refresh().await?;
    super::print_dashboard(tracker);
    Ok(())
}

pub fn sign_out(tracker: &mut Tracker) -> Result<()> {
    tracker.sign_out()?;
    log::info!("signed out");
    Ok(())
}

impl CommandRunner for cli::AccountCmd {
    async fn run(&self, tracker: &mut Tracker) -> Result<()> {
        match self {
            cli::AccountCmd::Change {
                username,
                password,
                confirm,
            } => {
                let (password, confirm) = match (password, confirm) {
                    (Some(p), Some(c)) => (p.clone(), c.clone()),
                    (Some(p), None) => (p.clone(), p.clone()),
                    (None, _) => prompt::prompt_new_password()?.ok_or_else(|| {
                        TrackerError::validation("All fields are required")
                    })?,
                };
                tracker.change_account(username, &password, &confirm)?;
                println!("Account updated. Signed in as {}", username.trim());
                Ok(())
            }
            cli::AccountCmd::Show => {
                match tracker.session().current_user() {
                    Some(user) => println!("Signed in as {user}"),
                    None => println!("Not signed in"),
                }
                Ok(())
            }
        }
    }
}
