use crate::error::{Result, WordgenError};
use serde::Deserialize;
use serde::de::IgnoredAny;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Raw OSINT input slots.
///
/// Declaration order is the order in which the normalizer walks a profile, so
/// token order never depends on how the profile was filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    First,
    Last,
    Middle,
    Nickname,
    Phone,
    Address,
    Age,
    Friends,
    Company,
    Pet,
    Hobby,
    BirthYear,
    BirthDate,
    Email,
    Domain,
    Custom,
}

impl Field {
    pub const ALL: [Field; 16] = [
        Field::First,
        Field::Last,
        Field::Middle,
        Field::Nickname,
        Field::Phone,
        Field::Address,
        Field::Age,
        Field::Friends,
        Field::Company,
        Field::Pet,
        Field::Hobby,
        Field::BirthYear,
        Field::BirthDate,
        Field::Email,
        Field::Domain,
        Field::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::First => "first",
            Field::Last => "last",
            Field::Middle => "middle",
            Field::Nickname => "nickname",
            Field::Phone => "phone",
            Field::Address => "address",
            Field::Age => "age",
            Field::Friends => "friends",
            Field::Company => "company",
            Field::Pet => "pet",
            Field::Hobby => "hobby",
            Field::BirthYear => "birth_year",
            Field::BirthDate => "birth_date",
            Field::Email => "email",
            Field::Domain => "domain",
            Field::Custom => "custom",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::First => "First name",
            Field::Last => "Last name",
            Field::Middle => "Middle name",
            Field::Nickname => "Nickname",
            Field::Phone => "Phone (e.g. +998901234567)",
            Field::Address => "Address / City",
            Field::Age => "Age (years)",
            Field::Friends => "Close friends (e.g. Ali,Karim)",
            Field::Company => "Company / Organisation",
            Field::Pet => "Pet name",
            Field::Hobby => "Hobby",
            Field::BirthYear => "Birth year",
            Field::BirthDate => "Birth date (e.g. 14.05.1990)",
            Field::Email => "Email",
            Field::Domain => "Domain",
            Field::Custom => "Other keywords (comma separated)",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = WordgenError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        let field = match key.as_str() {
            "first" | "first_name" | "name" => Field::First,
            "last" | "last_name" | "surname" => Field::Last,
            "middle" | "middle_name" => Field::Middle,
            "nickname" | "nick" => Field::Nickname,
            "phone" => Field::Phone,
            "address" | "city" => Field::Address,
            "age" => Field::Age,
            "friends" | "friend" => Field::Friends,
            "company" => Field::Company,
            "pet" => Field::Pet,
            "hobby" => Field::Hobby,
            "birth_year" | "year" => Field::BirthYear,
            "birth_date" | "date" => Field::BirthDate,
            "email" => Field::Email,
            "domain" => Field::Domain,
            "custom" | "keyword" | "keywords" => Field::Custom,
            _ => return Err(WordgenError::UnknownField(s.to_string())),
        };
        Ok(field)
    }
}

/// A profile file entry. Numbers are taken as their decimal text; `null`,
/// booleans and objects carry nothing usable and are dropped.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Many(Vec<FieldValue>),
    Unusable(IgnoredAny),
}

impl FieldValue {
    fn collect_into(self, field: Field, profile: &mut Profile) {
        match self {
            FieldValue::Text(v) => profile.insert(field, v),
            FieldValue::Integer(n) => profile.insert(field, n.to_string()),
            FieldValue::Float(x) => profile.insert(field, x.to_string()),
            FieldValue::Many(values) => {
                for value in values {
                    value.collect_into(field, profile);
                }
            }
            FieldValue::Unusable(_) => debug!(field = %field, "unusable profile value skipped"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BTreeMap<String, FieldValue>")]
pub struct Profile {
    fields: BTreeMap<Field, Vec<String>>,
}

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, value: impl Into<String>) {
        self.fields.entry(field).or_default().push(value.into());
    }

    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn values(&self, field: Field) -> &[String] {
        self.fields.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Canonical field order, then insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.fields
            .iter()
            .flat_map(|(field, values)| values.iter().map(move |v| (*field, v.as_str())))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.values().all(|values| values.is_empty())
    }
}

impl TryFrom<BTreeMap<String, FieldValue>> for Profile {
    type Error = WordgenError;

    fn try_from(raw: BTreeMap<String, FieldValue>) -> Result<Self> {
        let mut profile = Profile::new();
        for (key, value) in raw {
            let field: Field = key.parse()?;
            value.collect_into(field, &mut profile);
        }
        Ok(profile)
    }
}
