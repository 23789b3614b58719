use serde::{Deserialize, Serialize};

use super::{max_length, required, FieldErrors, Validate};

pub const NAME_MAX: usize = 50;
pub const COLOR_MAX: usize = 20;

/// Shared by the toy create and update forms
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToyForm {
    pub name: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToyFields {
    pub name: String,
    pub color: String,
}

impl Validate for ToyForm {
    type Output = ToyFields;
    const NAME: &'static str = "toy_form";

    fn validate(&self) -> Result<ToyFields, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = required(&mut errors, "name", &self.name).and_then(|v| max_length(&mut errors, "name", v, NAME_MAX));
        let color =
            required(&mut errors, "color", &self.color).and_then(|v| max_length(&mut errors, "color", v, COLOR_MAX));

        match (name, color) {
            (Some(name), Some(color)) => Ok(ToyFields {
                name: name.to_string(),
                color: color.to_string(),
            }),
            _ => Err(errors),
        }
    }
}
