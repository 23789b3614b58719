use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use super::ChoiceError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Feeding {
    pub id: i64,
    pub date: NaiveDate,
    #[sqlx(try_from = "String")]
    pub meal: Meal,
    pub cat_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Meal {
    Breakfast,
    Lunch,
    Dinner,
}

impl Meal {
    pub const ALL: [Meal; 3] = [Meal::Breakfast, Meal::Lunch, Meal::Dinner];

    pub fn as_str(&self) -> &'static str {
        match self {
            Meal::Breakfast => "breakfast",
            Meal::Lunch => "lunch",
            Meal::Dinner => "dinner",
        }
    }

    pub fn choices() -> Vec<&'static str> {
        Self::ALL.iter().map(Meal::as_str).collect()
    }
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Meal {
    type Err = ChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "breakfast" | "b" => Ok(Meal::Breakfast),
            "lunch" | "l" => Ok(Meal::Lunch),
            "dinner" | "d" => Ok(Meal::Dinner),
            _ => Err(ChoiceError::new("meal", s)),
        }
    }
}

impl TryFrom<String> for Meal {
    type Error = ChoiceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_names_and_codes() {
        assert_eq!("dinner".parse::<Meal>().unwrap(), Meal::Dinner);
        assert_eq!("B".parse::<Meal>().unwrap(), Meal::Breakfast);
        assert_eq!(" Lunch ".parse::<Meal>().unwrap(), Meal::Lunch);
        assert!("brunch".parse::<Meal>().is_err());
    }
}
