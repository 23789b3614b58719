use serde::{Deserialize, Serialize};

use super::{max_length, required, FieldErrors, Validate};
use crate::database::models::Breed;

pub const NAME_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 250;
pub const AGE_MAX: i32 = 40;

/// Create form: name, breed, description, age
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatForm {
    pub name: Option<String>,
    pub breed: Option<String>,
    pub description: Option<String>,
    pub age: Option<String>,
}

/// Update form. There is no name field: a cat cannot be renamed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatUpdateForm {
    pub breed: Option<String>,
    pub description: Option<String>,
    pub age: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatFields {
    pub name: String,
    pub breed: Breed,
    pub description: String,
    pub age: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatChanges {
    pub breed: Breed,
    pub description: String,
    pub age: i32,
}

fn breed(errors: &mut FieldErrors, value: &Option<String>) -> Option<Breed> {
    let raw = required(errors, "breed", value)?;
    match raw.parse::<Breed>() {
        Ok(breed) => Some(breed),
        Err(_) => {
            errors.insert(
                "breed".to_string(),
                format!("Select a valid choice. {} is not one of the available choices.", raw),
            );
            None
        }
    }
}

fn description(errors: &mut FieldErrors, value: &Option<String>) -> Option<String> {
    let raw = value.as_deref().map(str::trim).unwrap_or_default();
    max_length(errors, "description", raw, DESCRIPTION_MAX).map(str::to_string)
}

fn age(errors: &mut FieldErrors, value: &Option<String>) -> Option<i32> {
    let raw = required(errors, "age", value)?;
    match raw.parse::<i32>() {
        Ok(age) if (0..=AGE_MAX).contains(&age) => Some(age),
        Ok(_) => {
            errors.insert("age".to_string(), format!("Age must be between 0 and {}.", AGE_MAX));
            None
        }
        Err(_) => {
            errors.insert("age".to_string(), "Enter a whole number.".to_string());
            None
        }
    }
}

impl Validate for CatForm {
    type Output = CatFields;
    const NAME: &'static str = "cat_form";

    fn validate(&self) -> Result<CatFields, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = required(&mut errors, "name", &self.name)
            .and_then(|n| max_length(&mut errors, "name", n, NAME_MAX))
            .map(str::to_string);
        let breed = breed(&mut errors, &self.breed);
        let description = description(&mut errors, &self.description);
        let age = age(&mut errors, &self.age);

        match (name, breed, description, age) {
            (Some(name), Some(breed), Some(description), Some(age)) if errors.is_empty() => Ok(CatFields {
                name,
                breed,
                description,
                age,
            }),
            _ => Err(errors),
        }
    }

    fn choices() -> Vec<(&'static str, Vec<&'static str>)> {
        vec![("breed", Breed::choices())]
    }
}

impl Validate for CatUpdateForm {
    type Output = CatChanges;
    const NAME: &'static str = "cat_update_form";

    fn validate(&self) -> Result<CatChanges, FieldErrors> {
        let mut errors = FieldErrors::new();
        let breed = breed(&mut errors, &self.breed);
        let description = description(&mut errors, &self.description);
        let age = age(&mut errors, &self.age);

        match (breed, description, age) {
            (Some(breed), Some(description), Some(age)) if errors.is_empty() => Ok(CatChanges {
                breed,
                description,
                age,
            }),
            _ => Err(errors),
        }
    }

    fn choices() -> Vec<(&'static str, Vec<&'static str>)> {
        vec![("breed", Breed::choices())]
    }
}
