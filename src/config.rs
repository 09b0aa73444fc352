//! Per-invocation configuration: delimiter, input encoding, output target, and
//! the ordered list of date/time layouts used to recognise `Time` values.
//!
//! Nothing here is global. A [`Config`] is built once in [`crate::run`] from
//! the command line and environment and handed down explicitly.

use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{Result, anyhow};
use chrono::{
    NaiveDate, NaiveDateTime, NaiveTime,
    format::{Fixed, Item, Pad, StrftimeItems},
};
use encoding_rs::Encoding;

use crate::{
    cli::{GlobalArgs, parse_delimiter},
    error::Error,
    io_utils,
};

/// Environment variable holding extra `;`-separated time layouts.
pub const TIME_LAYOUTS_ENV: &str = "CSV_TIME_LAYOUTS";
/// Environment variable overriding the default delimiter.
pub const DELIMITER_ENV: &str = "CSV_DELIMITER";

/// Built-in layouts. chrono's `%m` and `%d` accept one or two digits when
/// parsing, so `%Y-%m-%d` covers both `2000-1-2` and `2000-01-02`.
pub const DEFAULT_TIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

/// Ordered, non-empty list of strftime patterns; first full parse wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeLayouts {
    layouts: Vec<Layout>,
}

impl Default for TimeLayouts {
    fn default() -> Self {
        Self {
            layouts: DEFAULT_TIME_LAYOUTS.iter().map(|l| Layout::new(l)).collect(),
        }
    }
}

/// A validated pattern plus the signs and blanks it spells out literally.
///
/// chrono skips whitespace ahead of numeric fields and accepts a signed
/// year, so `" 2000-01-01"`, `"2000- 1- 1"` and `"+2000-01-01"` would all
/// parse. Text only matches when it carries exactly the literal signs and
/// blanks of the pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Layout {
    pattern: String,
    plus: usize,
    minus: usize,
    /// Set when a UTC offset field brings its own sign.
    offset: bool,
    /// `None` when a space-padded field makes the blank count vary.
    blanks: Option<usize>,
}

impl Layout {
    fn new(pattern: &str) -> Self {
        let mut layout = Self {
            pattern: pattern.to_string(),
            plus: 0,
            minus: 0,
            offset: false,
            blanks: Some(0),
        };
        for item in StrftimeItems::new(pattern) {
            match item {
                Item::Literal(text) | Item::Space(text) => layout.count_literal(text),
                Item::OwnedLiteral(text) | Item::OwnedSpace(text) => layout.count_literal(&text),
                Item::Numeric(_, Pad::Space) => layout.blanks = None,
                Item::Fixed(
                    Fixed::TimezoneOffset
                    | Fixed::TimezoneOffsetColon
                    | Fixed::TimezoneOffsetDoubleColon
                    | Fixed::TimezoneOffsetTripleColon
                    | Fixed::TimezoneOffsetColonZ
                    | Fixed::TimezoneOffsetZ
                    | Fixed::RFC2822
                    | Fixed::RFC3339,
                ) => layout.offset = true,
                _ => {}
            }
        }
        layout
    }

    fn count_literal(&mut self, text: &str) {
        self.plus += count(text, |c| c == '+');
        self.minus += count(text, |c| c == '-');
        if let Some(blanks) = self.blanks.as_mut() {
            *blanks += count(text, char::is_whitespace);
        }
    }

    fn admits(&self, text: &str) -> bool {
        let signs_match = self.offset
            || (count(text, |c| c == '+') == self.plus && count(text, |c| c == '-') == self.minus);
        signs_match
            && self
                .blanks
                .is_none_or(|blanks| count(text, char::is_whitespace) == blanks)
    }
}

fn count(text: &str, pred: impl Fn(char) -> bool) -> usize {
    text.chars().filter(|&c| pred(c)).count()
}

impl TimeLayouts {
    /// Appends `extra` after the current layouts.
    pub fn extended<I, S>(mut self, extra: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_all(extra)?;
        Ok(self)
    }

    fn push_all<I, S>(&mut self, layouts: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for layout in layouts {
            let layout = layout.into();
            validate_layout(&layout)?;
            self.layouts.push(Layout::new(&layout));
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.layouts.iter().map(|l| l.pattern.as_str())
    }

    /// Parses `text` with the first layout that consumes it entirely.
    /// Date-only layouts produce midnight.
    pub fn parse(&self, text: &str) -> Option<NaiveDateTime> {
        self.layouts
            .iter()
            .filter(|layout| layout.admits(text))
            .find_map(|layout| {
                let pattern = layout.pattern.as_str();
                NaiveDateTime::parse_from_str(text, pattern)
                    .or_else(|_| {
                        NaiveDate::parse_from_str(text, pattern)
                            .map(|d| d.and_time(NaiveTime::MIN))
                    })
                    .ok()
            })
    }
}

fn validate_layout(layout: &str) -> Result<(), Error> {
    if layout.trim().is_empty()
        || StrftimeItems::new(layout).any(|item| matches!(item, Item::Error))
    {
        return Err(Error::Layout(layout.to_string()));
    }
    Ok(())
}

/// Splits a `;`-separated layout list, as found in [`TIME_LAYOUTS_ENV`].
pub fn split_layouts(raw: &str) -> Vec<String> {
    raw.split(';').map(|l| l.to_string()).collect()
}

#[derive(Debug, Clone)]
pub struct Config {
    pub delimiter: Option<u8>,
    pub input_encoding: &'static Encoding,
    pub time_layouts: TimeLayouts,
    /// Destination for command output; stdout when `None`.
    pub output: Option<PathBuf>,
}

impl Config {
    /// Resolves configuration from the global flags, falling back to the
    /// environment and then to built-in defaults.
    pub fn from_args(args: &GlobalArgs) -> Result<Self> {
        let delimiter = match args.delimiter {
            Some(d) => Some(d),
            None => match env::var(DELIMITER_ENV) {
                Ok(raw) if !raw.is_empty() => Some(
                    parse_delimiter(&raw).map_err(|err| anyhow!("{DELIMITER_ENV}: {err}"))?,
                ),
                _ => None,
            },
        };
        let input_encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;

        let mut time_layouts = TimeLayouts::default();
        if let Ok(raw) = env::var(TIME_LAYOUTS_ENV)
            && !raw.is_empty()
        {
            time_layouts = time_layouts
                .extended(split_layouts(&raw))
                .map_err(|err| anyhow!("{TIME_LAYOUTS_ENV}: {err}"))?;
        }
        time_layouts = time_layouts.extended(args.time_layouts.iter().cloned())?;

        Ok(Self {
            delimiter,
            input_encoding,
            time_layouts,
            output: args.output.clone(),
        })
    }

    pub fn delimiter_for(&self, input: Option<&Path>) -> u8 {
        match input {
            Some(path) => io_utils::resolve_input_delimiter(path, self.delimiter),
            None => self.delimiter.unwrap_or(io_utils::DEFAULT_CSV_DELIMITER),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delimiter: None,
            input_encoding: encoding_rs::UTF_8,
            time_layouts: TimeLayouts::default(),
            output: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layouts_cover_padded_and_unpadded_dates() {
        let layouts = TimeLayouts::default();
        let expected = NaiveDate::from_ymd_opt(2000, 1, 2)
            .unwrap()
            .and_time(NaiveTime::MIN);
        for text in ["2000-1-2", "2000-01-02", "1/2/2000", "01/02/2000"] {
            assert_eq!(layouts.parse(text), Some(expected), "{text}");
        }
    }

    #[test]
    fn default_layouts_parse_datetimes() {
        let layouts = TimeLayouts::default();
        let expected = NaiveDate::from_ymd_opt(2024, 5, 6)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        assert_eq!(layouts.parse("2024-05-06 14:30:00"), Some(expected));
        assert_eq!(layouts.parse("2024-05-06T14:30:00"), Some(expected));
    }

    #[test]
    fn partial_matches_are_rejected() {
        let layouts = TimeLayouts::default();
        assert_eq!(layouts.parse("2000-01-02 and then some"), None);
        assert_eq!(layouts.parse("Jan. 1, 2000"), None);
    }

    #[test]
    fn stray_blanks_and_signs_are_rejected() {
        let layouts = TimeLayouts::default();
        for text in [" 2000-01-01", "2000-01-01 ", "2000- 1- 1", "+2000-01-01", "1/2/-2000"] {
            assert_eq!(layouts.parse(text), None, "{text:?}");
        }
    }

    #[test]
    fn space_padded_fields_still_match() {
        let layouts = TimeLayouts::default()
            .extended(["%e %b %Y"])
            .expect("valid layout");
        let expected = NaiveDate::from_ymd_opt(2000, 1, 2)
            .unwrap()
            .and_time(NaiveTime::MIN);
        assert_eq!(layouts.parse(" 2 Jan 2000"), Some(expected));
        assert!(layouts.parse("12 Jan 2000").is_some());
    }

    #[test]
    fn offset_layouts_keep_their_signs() {
        let layouts = TimeLayouts::default()
            .extended(["%Y-%m-%d %H:%M:%S %z"])
            .expect("valid layout");
        assert!(layouts.parse("2000-01-02 03:04:05 +0100").is_some());
        assert!(layouts.parse("2000-01-02 03:04:05 -0130").is_some());
    }

    #[test]
    fn no_default_layout_is_empty() {
        assert!(TimeLayouts::default().iter().all(|l| !l.is_empty()));
    }

    #[test]
    fn extended_layouts_are_tried_after_defaults() {
        let layouts = TimeLayouts::default()
            .extended(["%b. %d, %Y"])
            .expect("valid layout");
        let expected = NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .and_time(NaiveTime::MIN);
        assert_eq!(layouts.parse("Jan. 1, 2000"), Some(expected));
        assert_eq!(layouts.iter().last(), Some("%b. %d, %Y"));
    }

    #[test]
    fn empty_and_malformed_layouts_are_rejected() {
        assert!(matches!(
            TimeLayouts::default().extended([""]),
            Err(Error::Layout(_))
        ));
        assert!(matches!(
            TimeLayouts::default().extended(["%Q"]),
            Err(Error::Layout(_))
        ));
    }

    #[test]
    fn split_layouts_keeps_commas_inside_patterns() {
        assert_eq!(
            split_layouts("%b %d, %Y;%d.%m.%Y"),
            vec!["%b %d, %Y".to_string(), "%d.%m.%Y".to_string()]
        );
    }
}
