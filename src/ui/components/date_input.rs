use chrono::{Datelike, NaiveDate};
use crossterm::event::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePart {
    Year,
    Month,
    Day,
}

impl DatePart {
    fn width(&self) -> usize {
        match self {
            DatePart::Year => 4,
            DatePart::Month | DatePart::Day => 2,
        }
    }

    fn placeholder(&self) -> &'static str {
        match self {
            DatePart::Year => "[YYYY]",
            DatePart::Month => "[MM]",
            DatePart::Day => "[DD]",
        }
    }
}

/// Digit-by-digit editing of a date, one part at a time
#[derive(Debug, Clone)]
pub struct DateInputState {
    pub date: NaiveDate,
    pub editing: bool,
    pub date_part: DatePart,
    pub pending: String,
}

impl DateInputState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            editing: false,
            date_part: DatePart::Year,
            pending: String::new(),
        }
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
        if self.editing {
            self.date_part = DatePart::Year;
        }
        self.pending.clear();
    }

    pub fn next_date_part(&mut self) {
        self.date_part = match self.date_part {
            DatePart::Year => DatePart::Month,
            DatePart::Month => DatePart::Day,
            DatePart::Day => DatePart::Year,
        };
        self.pending.clear();
    }

    pub fn previous_date_part(&mut self) {
        self.date_part = match self.date_part {
            DatePart::Year => DatePart::Day,
            DatePart::Month => DatePart::Year,
            DatePart::Day => DatePart::Month,
        };
        self.pending.clear();
    }

    pub fn handle_input(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match key {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.pending.push(c);
                if self.pending.len() == self.date_part.width() {
                    self.apply_pending();
                    self.pending.clear();
                }
            }
            KeyCode::Backspace => {
                self.pending.pop();
            }
            KeyCode::Right => self.next_date_part(),
            KeyCode::Left => self.previous_date_part(),
            _ => {}
        }
    }

    // Out-of-range input leaves the date untouched
    fn apply_pending(&mut self) {
        let (year, month, day) = (self.date.year(), self.date.month(), self.date.day());
        let Ok(value) = self.pending.parse::<u32>() else {
            return;
        };

        let candidate = match self.date_part {
            DatePart::Year if (1900..=2100).contains(&value) => {
                let year = value as i32;
                NaiveDate::from_ymd_opt(year, month, day.min(days_in_month(year, month)))
            }
            DatePart::Month if (1..=12).contains(&value) => {
                NaiveDate::from_ymd_opt(year, value, day.min(days_in_month(year, value)))
            }
            DatePart::Day => NaiveDate::from_ymd_opt(year, month, value),
            _ => None,
        };

        if let Some(date) = candidate {
            self.date = date;
        }
    }

    pub fn get_display_string(&self) -> String {
        let year = format!("{:04}", self.date.year());
        let month = format!("{:02}", self.date.month());
        let day = format!("{:02}", self.date.day());

        if !self.editing {
            return format!("{}-{}-{}", year, month, day);
        }

        let marker = if self.pending.is_empty() {
            self.date_part.placeholder().to_string()
        } else {
            format!("[{}]", self.pending)
        };

        match self.date_part {
            DatePart::Year => format!("{}{}-{}-{}", year, marker, month, day),
            DatePart::Month => format!("{}-{}{}-{}", year, month, marker, day),
            DatePart::Day => format!("{}-{}-{}{}", year, month, day, marker),
        }
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editing(date: NaiveDate) -> DateInputState {
        let mut state = DateInputState::new(date);
        state.toggle_editing();
        state
    }

    fn type_digits(state: &mut DateInputState, digits: &str) {
        for c in digits.chars() {
            state.handle_input(KeyCode::Char(c));
        }
    }

    #[test]
    fn typing_each_part_sets_the_date() {
        let mut state = editing(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        type_digits(&mut state, "2024");
        state.handle_input(KeyCode::Right);
        type_digits(&mut state, "03");
        state.handle_input(KeyCode::Right);
        type_digits(&mut state, "09");

        assert_eq!(state.date, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
    }

    #[test]
    fn invalid_day_is_ignored() {
        let mut state = editing(NaiveDate::from_ymd_opt(2025, 2, 10).unwrap());
        state.date_part = DatePart::Day;
        type_digits(&mut state, "30");
        assert_eq!(state.date.day(), 10);
    }

    #[test]
    fn month_change_clamps_the_day() {
        let mut state = editing(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        state.date_part = DatePart::Month;
        type_digits(&mut state, "02");
        assert_eq!(state.date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn display_marks_the_part_being_edited() {
        let mut state = editing(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(state.get_display_string(), "2025[YYYY]-06-01");
        type_digits(&mut state, "20");
        assert_eq!(state.get_display_string(), "2025[20]-06-01");
        state.toggle_editing();
        assert_eq!(state.get_display_string(), "2025-06-01");
    }
}
