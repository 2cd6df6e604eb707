use chrono::{DateTime, Duration, Utc};

pub fn format_day(date: DateTime<Utc>) -> String {
    date.format("%b %d").to_string().to_uppercase()
}

pub fn format_time(date: DateTime<Utc>) -> String {
    date.format("%H:%M").to_string()
}

/// The `d/m/y H:i` layout the date inputs use.
pub fn format_date_time(date: DateTime<Utc>) -> String {
    date.format("%d/%m/%y %H:%M").to_string()
}

/// `30M`, `02H 05M` or `01D 00H 15M`, depending on length.
pub fn format_duration(duration: Duration) -> String {
    let total_minutes = duration.num_minutes().max(0);
    let days = total_minutes / (24 * 60);
    let hours = (total_minutes / 60) % 24;
    let minutes = total_minutes % 60;

    if days > 0 {
        format!("{days:02}D {hours:02}H {minutes:02}M")
    } else if hours > 0 {
        format!("{hours:02}H {minutes:02}M")
    } else {
        format!("{minutes:02}M")
    }
}

pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_durations_by_magnitude() {
        assert_eq!(format_duration(Duration::minutes(30)), "30M");
        assert_eq!(format_duration(Duration::minutes(125)), "02H 05M");
        assert_eq!(format_duration(Duration::minutes(24 * 60 + 15)), "01D 00H 15M");
        assert_eq!(format_duration(Duration::minutes(-5)), "00M");
    }

    #[test]
    fn formats_dates_for_rows_and_inputs() {
        let date: DateTime<Utc> = "2024-03-18T10:30:00Z".parse().expect("timestamp");
        assert_eq!(format_day(date), "MAR 18");
        assert_eq!(format_time(date), "10:30");
        assert_eq!(format_date_time(date), "18/03/24 10:30");
    }

    #[test]
    fn capitalizes_first_letter() {
        assert_eq!(capitalize("check-in"), "Check-in");
        assert_eq!(capitalize(""), "");
    }
}
