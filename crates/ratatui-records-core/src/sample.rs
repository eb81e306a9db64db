//! The seed dataset shown when no backend is wired in.

use crate::record::Record;
use crate::record::Status;

fn record(
    id: u64,
    first_name: &str,
    last_name: &str,
    email: &str,
    age: i64,
    status: Status,
    date_joined: &str,
) -> Record {
    Record {
        id,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email.to_string(),
        age,
        status,
        date_joined: date_joined.to_string(),
    }
}

pub fn sample_records() -> Vec<Record> {
    use Status::Active;
    use Status::Inactive;
    use Status::Pending;

    vec![
        record(1, "John", "Doe", "john@example.com", 30, Active, "2020-01-01"),
        record(2, "Jane", "Smith", "jane.smith@example.com", 25, Inactive, "2021-03-15"),
        record(3, "Robert", "Brown", "robert.brown@example.com", 45, Pending, "2019-07-21"),
        record(4, "Emily", "Clark", "emily.clark@example.com", 32, Active, "2022-10-11"),
        record(5, "Michael", "Taylor", "michael.taylor@example.com", 40, Inactive, "2018-04-05"),
        record(6, "Olivia", "Harris", "olivia.harris@example.com", 29, Active, "2023-01-01"),
        record(7, "William", "Adams", "william.adams@example.com", 55, Pending, "2017-12-25"),
        record(8, "Sophia", "White", "sophia.white@example.com", 22, Active, "2021-08-14"),
        record(9, "James", "Garcia", "james.garcia@example.com", 38, Inactive, "2020-06-10"),
        record(10, "Isabella", "Lee", "isabella.lee@example.com", 33, Active, "2022-09-19"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn ids_are_unique() {
        let records = sample_records();
        let ids: BTreeSet<_> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), records.len());
    }
}
