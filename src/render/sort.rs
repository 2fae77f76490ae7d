use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::card::RecordCard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// Oldest file date first; undated files last.
    DateAsc,
    /// Newest file date first; undated files last.
    DateDesc,
    TitleAsc,
    TitleDesc,
    /// Most recently added first.
    Newest,
    Oldest,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::DateAsc => "date-asc",
            SortMode::DateDesc => "date-desc",
            SortMode::TitleAsc => "title-asc",
            SortMode::TitleDesc => "title-desc",
            SortMode::Newest => "newest",
            SortMode::Oldest => "oldest",
        }
    }

    /// Total order over cards; ties fall back to id so results are stable.
    pub fn compare(&self, a: &RecordCard, b: &RecordCard) -> Ordering {
        let primary = match self {
            SortMode::DateAsc => match (a.file_date, b.file_date) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            SortMode::DateDesc => match (a.file_date, b.file_date) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            SortMode::TitleAsc => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortMode::TitleDesc => b.title.to_lowercase().cmp(&a.title.to_lowercase()),
            SortMode::Newest => b.id.cmp(&a.id),
            SortMode::Oldest => a.id.cmp(&b.id),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown sort mode: {0}")]
pub struct UnknownSortMode(String);

impl FromStr for SortMode {
    type Err = UnknownSortMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "date-asc" => Ok(SortMode::DateAsc),
            "date-desc" => Ok(SortMode::DateDesc),
            "title-asc" => Ok(SortMode::TitleAsc),
            "title-desc" => Ok(SortMode::TitleDesc),
            "newest" => Ok(SortMode::Newest),
            "oldest" => Ok(SortMode::Oldest),
            other => Err(UnknownSortMode(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn card(id: i64, title: &str, day: Option<u32>) -> RecordCard {
        RecordCard {
            id,
            title: title.to_string(),
            storage: "Shelf".to_string(),
            info: None,
            file_date: day.map(|d| Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()),
            has_image: false,
            borrowed_by: None,
        }
    }

    fn sorted_ids(mode: SortMode, mut cards: Vec<RecordCard>) -> Vec<i64> {
        cards.sort_by(|a, b| mode.compare(a, b));
        cards.iter().map(|c| c.id).collect()
    }

    #[test]
    fn date_sorts_put_undated_last() {
        let cards = vec![card(1, "a", None), card(2, "b", Some(9)), card(3, "c", Some(2))];
        assert_eq!(sorted_ids(SortMode::DateAsc, cards.clone()), vec![3, 2, 1]);
        assert_eq!(sorted_ids(SortMode::DateDesc, cards), vec![2, 3, 1]);
    }

    #[test]
    fn title_sort_ignores_case_and_breaks_ties_by_id() {
        let cards = vec![card(5, "beta", None), card(4, "Alpha", None), card(3, "alpha", None)];
        assert_eq!(sorted_ids(SortMode::TitleAsc, cards.clone()), vec![3, 4, 5]);
        assert_eq!(sorted_ids(SortMode::TitleDesc, cards), vec![5, 3, 4]);
    }

    #[test]
    fn created_order_follows_ids() {
        let cards = vec![card(2, "x", None), card(9, "y", None), card(4, "z", None)];
        assert_eq!(sorted_ids(SortMode::Newest, cards.clone()), vec![9, 4, 2]);
        assert_eq!(sorted_ids(SortMode::Oldest, cards), vec![2, 4, 9]);
    }

    #[test]
    fn parses_its_own_display() {
        for mode in [
            SortMode::DateAsc,
            SortMode::DateDesc,
            SortMode::TitleAsc,
            SortMode::TitleDesc,
            SortMode::Newest,
            SortMode::Oldest,
        ] {
            assert_eq!(mode.to_string().parse::<SortMode>(), Ok(mode));
        }
        assert!("sideways".parse::<SortMode>().is_err());
    }
}
