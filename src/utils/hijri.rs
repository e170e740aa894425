use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate};
use hijri_date::HijriDate;

use crate::utils::date::date_key;

/// Islamic month names in English (index 0 = Muharram = month 1)
const HIJRI_MONTH_NAMES: &[&str] = &[
    "Muharram",
    "Safar",
    "Rabi' al-Awwal",
    "Rabi' al-Thani",
    "Jumada al-Awwal",
    "Jumada al-Thani",
    "Rajab",
    "Sha'ban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qi'dah",
    "Dhu al-Hijjah",
];

fn hijri_month_name(month: usize) -> &'static str {
    if (1..=12).contains(&month) {
        HIJRI_MONTH_NAMES[month - 1]
    } else {
        "Unknown"
    }
}

pub struct HijriInfo {
    pub day: usize,
    pub year: usize,
    pub month_name: String,
}

impl HijriInfo {
    pub fn formatted(&self) -> String {
        format!("{} {} {}", self.day, self.month_name, self.year)
    }
}

/// Convert a Gregorian date, shifted by `offset_days` for local moon sighting
/// (e.g. -1 if your country is one day behind Saudi Arabia).
pub fn to_hijri(date: NaiveDate, offset_days: i32) -> Result<HijriInfo> {
    let adjusted = date + Duration::days(offset_days as i64);
    let hd = HijriDate::from_gr(
        adjusted.year() as usize,
        adjusted.month() as usize,
        adjusted.day() as usize,
    )
    .map_err(|e| anyhow::anyhow!("Hijri conversion error: {}", e))?;

    Ok(HijriInfo {
        day: hd.day(),
        year: hd.year(),
        month_name: hijri_month_name(hd.month()).to_string(),
    })
}

/// Label for a date in listings: the Hijri date when enabled and convertible,
/// otherwise the plain date key.
pub fn date_label(date: NaiveDate, hijri: bool, offset_days: i32) -> String {
    if !hijri {
        return date_key(date);
    }
    match to_hijri(date, offset_days) {
        Ok(info) => info.formatted(),
        Err(e) => {
            log::warn!("falling back to gregorian label for {}: {}", date, e);
            date_key(date)
        }
    }
}
