use anyhow::Result;

use crate::cli::ThemeChoice;
use crate::render::SortMode;
use crate::tracker::Tracker;

pub fn sort(tracker: &mut Tracker, mode: Option<SortMode>) -> Result<()> {
    tracker.set_sort_mode(mode)?;
    match mode {
        Some(mode) => println!("Sort mode: {mode}"),
        None => println!("Sort mode: none"),
    }
    Ok(())
}

pub fn theme(tracker: &mut Tracker, choice: ThemeChoice) -> Result<()> {
    let prefs = tracker.preferences();
    let current = prefs.theme()?;
    let next = match choice {
        ThemeChoice::Show => current,
        ThemeChoice::Light => crate::preferences::Theme::Light,
        ThemeChoice::Dark => crate::preferences::Theme::Dark,
        ThemeChoice::Toggle => current.toggled(),
    };
    if next != current {
        prefs.set_theme(next)?;
    }
    println!("Theme: {next}");
    Ok(())
}
