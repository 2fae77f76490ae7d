use anyhow::{bail, Context, Result};
use std::io::IsTerminal;

/// Returns `given` or asks for it on the terminal without echo.
/// Fails when stdin is not interactive and nothing was given.
pub fn password_or_prompt(given: Option<&str>, label: &str) -> Result<String> {
    if let Some(p) = given {
        return Ok(p.to_string());
    }
    if !std::io::stdin().is_terminal() {
        bail!("{label} is required (pass it as an option when not on a terminal)");
    }
    rpassword::prompt_password(format!("{label}: ")).with_context(|| format!("read {label}"))
}

/// Prompt for a new password twice. `None` if stdin is not interactive.
pub fn prompt_new_password() -> Result<Option<(String, String)>> {
    if !std::io::stdin().is_terminal() {
        return Ok(None);
    }
    let p1 = rpassword::prompt_password("New password: ").context("read password")?;
    let p2 = rpassword::prompt_password("Confirm password: ").context("confirm password")?;
    Ok(Some((p1, p2)))
}
