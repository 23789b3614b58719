use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{required, FieldErrors, Validate};
use crate::database::models::Meal;

/// Only date and meal are read; the cat comes from the URL
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedingForm {
    pub date: Option<String>,
    pub meal: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedingFields {
    pub date: NaiveDate,
    pub meal: Meal,
}

impl Validate for FeedingForm {
    type Output = FeedingFields;
    const NAME: &'static str = "feeding_form";

    fn validate(&self) -> Result<FeedingFields, FieldErrors> {
        let mut errors = FieldErrors::new();

        let date = required(&mut errors, "date", &self.date).and_then(|raw| {
            match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.insert("date".to_string(), "Enter a valid date (YYYY-MM-DD).".to_string());
                    None
                }
            }
        });

        let meal = required(&mut errors, "meal", &self.meal).and_then(|raw| match raw.parse::<Meal>() {
            Ok(meal) => Some(meal),
            Err(_) => {
                errors.insert(
                    "meal".to_string(),
                    format!("Select a valid choice. {} is not one of the available choices.", raw),
                );
                None
            }
        });

        match (date, meal) {
            (Some(date), Some(meal)) => Ok(FeedingFields { date, meal }),
            _ => Err(errors),
        }
    }

    fn choices() -> Vec<(&'static str, Vec<&'static str>)> {
        vec![("meal", Meal::choices())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates() {
        let form = FeedingForm { date: Some("2024-01-01".into()), meal: Some("breakfast".into()) };
        let fields = form.validate().unwrap();
        assert_eq!(fields.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(fields.meal, Meal::Breakfast);
    }

    #[test]
    fn rejects_bad_dates_and_meals() {
        let form = FeedingForm { date: Some("01/02/2024".into()), meal: Some("brunch".into()) };
        let errors = form.validate().unwrap_err();
        assert!(errors.contains_key("date"));
        assert!(errors.contains_key("meal"));
    }
}
