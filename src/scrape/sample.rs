// src/scrape/sample.rs

/// The four text fields read on one polling cycle, trimmed but otherwise raw.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fields {
    pub multiplier: String,
    pub bets: String,
    pub prize: String,
    pub players: String,
}

/// One CSV row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sample {
    pub timestamp: String,
    pub multiplier: String,
    pub bets: String,
    pub prize: String,
    pub players: String,
}

impl Sample {
    /// Only the multiplier is touched: its trailing unit goes away.
    pub fn new(timestamp: String, fields: Fields) -> Self {
        Self {
            timestamp,
            multiplier: s!(strip_unit(&fields.multiplier)),
            bets: fields.bets,
            prize: fields.prize,
            players: fields.players,
        }
    }

    /// Cells in CSV column order.
    pub fn to_row(&self) -> [&str; 5] {
        [&self.timestamp, &self.multiplier, &self.bets, &self.prize, &self.players]
    }
}

/// `"2.5x"` → `"2.5"`, `"1.07 x"` → `"1.07"`. Anything after the last digit is dropped.
pub fn strip_unit(raw: &str) -> &str {
    raw.trim().trim_end_matches(|c: char| !c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_unit_variants() {
        assert_eq!(strip_unit("3.25x"), "3.25");
        assert_eq!(strip_unit("1.07 x"), "1.07");
        assert_eq!(strip_unit(" 12x "), "12");
        assert_eq!(strip_unit("2.00"), "2.00");
        assert_eq!(strip_unit("x"), "");
    }

    #[test]
    fn sample_copies_other_fields_verbatim() {
        let f = Fields {
            multiplier: s!("3.25x"),
            bets: s!("1 204.50"),
            prize: s!("400"),
            players: s!("15"),
        };
        let s = Sample::new(s!("2024-06-20 10:00:00"), f);
        assert_eq!(s.to_row(), ["2024-06-20 10:00:00", "3.25", "1 204.50", "400", "15"]);
    }
}
