//! Customer-related types
//!
//! A customer owns accounts. The personal fields shared between the stored
//! record and the data used to create or update it live in [`Person`], which
//! both embed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Customer identifier, assigned by the directory starting at 1
pub type CustomerId = u64;

/// Gender of a person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" | "masculino" => Ok(Gender::Male),
            "female" | "f" | "femenino" => Ok(Gender::Female),
            "other" | "o" | "otro" => Ok(Gender::Other),
            other => Err(format!("Invalid gender '{}'", other)),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
            Gender::Other => "OTHER",
        };
        f.write_str(label)
    }
}

/// Personal data of a customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub gender: Gender,
    pub age: u8,
    /// National identification document, unique across customers
    pub identification: String,
    pub address: String,
    pub phone: String,
}

/// Data required to register or update a customer
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerDraft {
    pub person: Person,
    pub active: bool,
}

impl CustomerDraft {
    /// Active customer with the given personal data
    pub fn new(person: Person) -> Self {
        Self {
            person,
            active: true,
        }
    }
}

/// Registered customer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Customer {
    pub id: CustomerId,
    #[serde(flatten)]
    pub person: Person,
    pub active: bool,
}

impl Customer {
    /// Build the stored record from a draft and its assigned id
    pub fn from_draft(id: CustomerId, draft: CustomerDraft) -> Self {
        Self {
            id,
            person: draft.person,
            active: draft.active,
        }
    }

    /// Display name used on statements
    pub fn name(&self) -> &str {
        &self.person.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("male", Gender::Male)]
    #[case("FEMALE", Gender::Female)]
    #[case("Masculino", Gender::Male)]
    #[case(" other ", Gender::Other)]
    fn test_gender_parsing(#[case] input: &str, #[case] expected: Gender) {
        assert_eq!(input.parse::<Gender>().unwrap(), expected);
    }

    #[test]
    fn test_gender_parsing_rejects_unknown() {
        assert!("robot".parse::<Gender>().is_err());
    }

    #[test]
    fn test_customer_from_draft_keeps_person() {
        let person = Person {
            name: "Jose Lema".to_string(),
            gender: Gender::Male,
            age: 35,
            identification: "0102030405".to_string(),
            address: "Otavalo sn y principal".to_string(),
            phone: "098254785".to_string(),
        };

        let customer = Customer::from_draft(3, CustomerDraft::new(person.clone()));

        assert_eq!(customer.id, 3);
        assert_eq!(customer.name(), "Jose Lema");
        assert_eq!(customer.person, person);
        assert!(customer.active);
    }
}
