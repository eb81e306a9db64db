//! The record model shown by the table.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::error::RecordError;

pub type RecordId = u64;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Active,
    Inactive,
    Pending,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Active, Status::Inactive, Status::Pending];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "Active",
            Status::Inactive => "Inactive",
            Status::Pending => "Pending",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| RecordError::UnknownStatus(s.to_string()))
    }
}

/// One row of the dataset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: i64,
    pub status: Status,
    /// Kept as entered; the table does not interpret dates.
    pub date_joined: String,
}

/// Addresses one field of a [`Record`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey {
    Id,
    FirstName,
    LastName,
    Email,
    Age,
    Status,
    DateJoined,
}

impl FieldKey {
    pub const ALL: [FieldKey; 7] = [
        FieldKey::Id,
        FieldKey::FirstName,
        FieldKey::LastName,
        FieldKey::Email,
        FieldKey::Age,
        FieldKey::Status,
        FieldKey::DateJoined,
    ];

    /// The accessor key used in serialized records.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::Id => "id",
            FieldKey::FirstName => "firstName",
            FieldKey::LastName => "lastName",
            FieldKey::Email => "email",
            FieldKey::Age => "age",
            FieldKey::Status => "status",
            FieldKey::DateJoined => "dateJoined",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Raw text values of a row being edited, keyed by field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CandidateValues(BTreeMap<FieldKey, String>);

impl CandidateValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: FieldKey) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn set(&mut self, field: FieldKey, value: impl Into<String>) {
        self.0.insert(field, value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(FieldKey, String)> for CandidateValues {
    fn from_iter<I: IntoIterator<Item = (FieldKey, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Record {
    /// Display text of one field.
    pub fn value(&self, field: FieldKey) -> String {
        match field {
            FieldKey::Id => self.id.to_string(),
            FieldKey::FirstName => self.first_name.clone(),
            FieldKey::LastName => self.last_name.clone(),
            FieldKey::Email => self.email.clone(),
            FieldKey::Age => self.age.to_string(),
            FieldKey::Status => self.status.to_string(),
            FieldKey::DateJoined => self.date_joined.clone(),
        }
    }

    /// Snapshot of the given fields as editable text.
    pub fn candidate_values(&self, fields: impl IntoIterator<Item = FieldKey>) -> CandidateValues {
        fields.into_iter().map(|f| (f, self.value(f))).collect()
    }

    /// Returns a copy of this record with `values` applied.
    ///
    /// Either every value converts and the new record is returned, or nothing changes.
    pub fn with_values(&self, values: &CandidateValues) -> Result<Record, RecordError> {
        let mut next = self.clone();
        for (field, raw) in values.iter() {
            match field {
                FieldKey::Id => {
                    if raw.trim() != self.id.to_string() {
                        return Err(RecordError::ReadOnly(field));
                    }
                }
                FieldKey::FirstName => next.first_name = raw.to_string(),
                FieldKey::LastName => next.last_name = raw.to_string(),
                FieldKey::Email => next.email = raw.to_string(),
                FieldKey::Age => {
                    next.age = raw
                        .trim()
                        .parse()
                        .map_err(|_| RecordError::InvalidInteger {
                            field,
                            value: raw.to_string(),
                        })?;
                }
                FieldKey::Status => next.status = raw.parse()?,
                FieldKey::DateJoined => next.date_joined = raw.to_string(),
            }
        }
        Ok(next)
    }
}

/// Parses a JSON array of records, as a backend would return them.
pub fn records_from_json(json: &str) -> Result<Vec<Record>, RecordError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> Record {
        Record {
            id: 2,
            first_name: "Jane".into(),
            last_name: "Smith".into(),
            email: "jane.smith@example.com".into(),
            age: 25,
            status: Status::Inactive,
            date_joined: "2021-03-15".into(),
        }
    }

    #[test]
    fn with_values_converts_typed_fields() {
        let mut values = CandidateValues::new();
        values.set(FieldKey::Age, " 26 ");
        values.set(FieldKey::Status, "Active");
        values.set(FieldKey::LastName, "Doe");
        let next = jane().with_values(&values).unwrap();
        assert_eq!(next.age, 26);
        assert_eq!(next.status, Status::Active);
        assert_eq!(next.last_name, "Doe");
        assert_eq!(next.id, 2);
    }

    #[test]
    fn with_values_is_all_or_nothing() {
        let mut values = CandidateValues::new();
        values.set(FieldKey::FirstName, "Janet");
        values.set(FieldKey::Age, "old");
        let err = jane().with_values(&values).unwrap_err();
        assert!(matches!(err, RecordError::InvalidInteger { field: FieldKey::Age, .. }));
    }

    #[test]
    fn id_is_immutable() {
        let mut values = CandidateValues::new();
        values.set(FieldKey::Id, "99");
        assert!(matches!(
            jane().with_values(&values),
            Err(RecordError::ReadOnly(FieldKey::Id))
        ));
    }

    #[test]
    fn parses_camel_case_json() {
        let json = r#"[{"id":1,"firstName":"John","lastName":"Doe","email":"john@example.com",
            "age":30,"status":"Active","dateJoined":"2020-01-01"}]"#;
        let records = records_from_json(json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].first_name, "John");
        assert_eq!(records[0].status, Status::Active);
    }

    #[test]
    fn rejects_unknown_status_in_json() {
        let json = r#"[{"id":1,"firstName":"John","lastName":"Doe","email":"john@example.com",
            "age":30,"status":"Archived","dateJoined":"2020-01-01"}]"#;
        assert!(matches!(records_from_json(json), Err(RecordError::Json(_))));
    }
}
