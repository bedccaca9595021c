use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;
use vodca::{AsRefln, Fromln};

/// Human-readable order reference, e.g. `ORD-20260806-1A2B3C`. Uniqueness is
/// backed by a unique index; a collision surfaces as a persistence error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct OrderNumber(String);

impl OrderNumber {
    pub fn new(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    pub fn generate(now: OffsetDateTime, entropy: Uuid) -> Self {
        let date = now.date();
        let suffix = entropy.simple().to_string()[..6].to_uppercase();
        Self(format!(
            "ORD-{:04}{:02}{:02}-{}",
            date.year(),
            u8::from(date.month()),
            date.day(),
            suffix
        ))
    }
}

#[cfg(test)]
mod test {
    use time::macros::datetime;
    use uuid::Uuid;

    use super::OrderNumber;

    #[test]
    fn generated_number_embeds_the_date() {
        let number = OrderNumber::generate(
            datetime!(2026-08-06 12:30 UTC),
            Uuid::parse_str("1a2b3c4d-0000-0000-0000-000000000000").unwrap(),
        );
        assert_eq!(number.as_ref(), "ORD-20260806-1A2B3C");
    }
}
