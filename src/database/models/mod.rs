pub mod cat;
pub mod feeding;
pub mod toy;
pub mod user;

pub use cat::{Breed, Cat};
pub use feeding::{Feeding, Meal};
pub use toy::Toy;
pub use user::{NewUser, User};

/// A stored or submitted value that is not one of a field's fixed choices
#[derive(Debug, Clone, thiserror::Error)]
#[error("'{value}' is not a valid {field}")]
pub struct ChoiceError {
    pub field: &'static str,
    pub value: String,
}

impl ChoiceError {
    pub fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}
