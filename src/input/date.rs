//! Typing mask for date inputs and the conversions to and from the ISO wire
//! format (`yyyy-mm-dd`).

use serde::{Deserialize, Serialize};

/// Display format of a masked date input.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DateFormat {
    #[default]
    #[serde(rename = "dd/mm/yyyy")]
    DdMmYyyy,
    #[serde(rename = "mm/dd/yyyy")]
    MmDdYyyy,
    #[serde(rename = "yyyy-mm-dd")]
    YyyyMmDd,
}

#[derive(Clone, Copy)]
enum Part {
    Day,
    Month,
    Year,
}

impl DateFormat {
    pub const fn separator(self) -> char {
        match self {
            DateFormat::DdMmYyyy | DateFormat::MmDdYyyy => '/',
            DateFormat::YyyyMmDd => '-',
        }
    }

    const fn layout(self) -> [(Part, usize); 3] {
        match self {
            DateFormat::DdMmYyyy => [(Part::Day, 2), (Part::Month, 2), (Part::Year, 4)],
            DateFormat::MmDdYyyy => [(Part::Month, 2), (Part::Day, 2), (Part::Year, 4)],
            DateFormat::YyyyMmDd => [(Part::Year, 4), (Part::Month, 2), (Part::Day, 2)],
        }
    }
}

const MAX_DIGITS: usize = 8;

/// Masks raw input into `format`, inserting separators only between
/// completed segments so partial input stays partial (`"123"` → `"12/3"`).
pub fn format_date_input(raw: &str, format: DateFormat) -> String {
    let digits: Vec<char> = raw
        .chars()
        .filter(char::is_ascii_digit)
        .take(MAX_DIGITS)
        .collect();

    let mut out = String::with_capacity(MAX_DIGITS + 2);
    let mut rest = digits.as_slice();
    for (_, width) in format.layout() {
        if rest.is_empty() {
            break;
        }
        if !out.is_empty() {
            out.push(format.separator());
        }
        let take = width.min(rest.len());
        out.extend(&rest[..take]);
        rest = &rest[take..];
    }
    out
}

/// Converts a displayed date to `yyyy-mm-dd`.
///
/// Input that does not split into exactly three segments is returned as-is.
pub fn parse_date_input(display: &str, format: DateFormat) -> String {
    let segments: Vec<&str> = display.split(format.separator()).collect();
    if segments.len() != 3 {
        return display.to_string();
    }

    let (mut day, mut month, mut year) = ("", "", "");
    for ((part, _), segment) in format.layout().into_iter().zip(segments) {
        match part {
            Part::Day => day = segment,
            Part::Month => month = segment,
            Part::Year => year = segment,
        }
    }

    format!("{year}-{month:0>2}-{day:0>2}")
}

/// Converts an ISO `yyyy-mm-dd` value back into `format` for display.
///
/// Anything that is not a three part ISO string is returned unchanged.
pub fn iso_to_display(iso: &str, format: DateFormat) -> String {
    let segments: Vec<&str> = iso.split('-').collect();
    let [year, month, day] = segments.as_slice() else {
        return iso.to_string();
    };

    let sep = format.separator();
    match format {
        DateFormat::DdMmYyyy => format!("{day}{sep}{month}{sep}{year}"),
        DateFormat::MmDdYyyy => format!("{month}{sep}{day}{sep}{year}"),
        DateFormat::YyyyMmDd => iso.to_string(),
    }
}
