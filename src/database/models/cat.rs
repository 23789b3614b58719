use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use super::ChoiceError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Cat {
    pub id: i64,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub breed: Breed,
    pub description: String,
    pub age: i32,
    pub owner_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Breed {
    Persian,
    Siamese,
    MaineCoon,
    Bengal,
    Ragdoll,
    Sphynx,
    BritishShorthair,
    Abyssinian,
    Tabby,
    Mixed,
}

impl Breed {
    pub const ALL: [Breed; 10] = [
        Breed::Persian,
        Breed::Siamese,
        Breed::MaineCoon,
        Breed::Bengal,
        Breed::Ragdoll,
        Breed::Sphynx,
        Breed::BritishShorthair,
        Breed::Abyssinian,
        Breed::Tabby,
        Breed::Mixed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Breed::Persian => "persian",
            Breed::Siamese => "siamese",
            Breed::MaineCoon => "maine_coon",
            Breed::Bengal => "bengal",
            Breed::Ragdoll => "ragdoll",
            Breed::Sphynx => "sphynx",
            Breed::BritishShorthair => "british_shorthair",
            Breed::Abyssinian => "abyssinian",
            Breed::Tabby => "tabby",
            Breed::Mixed => "mixed",
        }
    }

    pub fn choices() -> Vec<&'static str> {
        Self::ALL.iter().map(Breed::as_str).collect()
    }
}

impl fmt::Display for Breed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Breed {
    type Err = ChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|breed| breed.as_str() == wanted)
            .ok_or_else(|| ChoiceError::new("breed", s))
    }
}

impl TryFrom<String> for Breed {
    type Error = ChoiceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
