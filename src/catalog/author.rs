//! The stored author entity and its public representations

use crate::catalog::age::current_age;
use crate::impl_shapeable;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// An author as kept in storage.
///
/// Field names here are storage column names; sorting resolves mapping
/// destinations against them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: DateTime<Utc>,
    pub date_of_death: Option<DateTime<Utc>>,
    pub main_category: String,
}

impl_shapeable!(Author, "Author", {
    "id" => id,
    "first_name" => first_name,
    "last_name" => last_name,
    "date_of_birth" => date_of_birth,
    "date_of_death" => date_of_death,
    "main_category" => main_category,
});

impl Author {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        date_of_birth: DateTime<Utc>,
        main_category: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            date_of_birth,
            date_of_death: None,
            main_category: main_category.into(),
        }
    }

    pub fn with_date_of_death(mut self, date_of_death: DateTime<Utc>) -> Self {
        self.date_of_death = Some(date_of_death);
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Default public representation of an author
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDto {
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    pub main_category: String,
}

impl_shapeable!(AuthorDto, "AuthorDto", {
    "id" => id,
    "name" => name,
    "age" => age,
    "mainCategory" => main_category,
});

impl AuthorDto {
    /// Build the representation with ages computed relative to `now`
    pub fn from_author_at(author: &Author, now: DateTime<Utc>) -> Self {
        Self {
            id: author.id,
            name: author.full_name(),
            age: current_age(author.date_of_birth, author.date_of_death, now),
            main_category: author.main_category.clone(),
        }
    }
}

impl From<&Author> for AuthorDto {
    fn from(author: &Author) -> Self {
        Self::from_author_at(author, Utc::now())
    }
}

/// Full public representation, requested with the `author.full` media type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorFullDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: DateTime<Utc>,
    pub date_of_death: Option<DateTime<Utc>>,
    pub main_category: String,
}

impl_shapeable!(AuthorFullDto, "AuthorFullDto", {
    "id" => id,
    "firstName" => first_name,
    "lastName" => last_name,
    "dateOfBirth" => date_of_birth,
    "dateOfDeath" => date_of_death,
    "mainCategory" => main_category,
});

impl From<&Author> for AuthorFullDto {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id,
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
            date_of_birth: author.date_of_birth,
            date_of_death: author.date_of_death,
            main_category: author.main_category.clone(),
        }
    }
}

/// Request body for creating an author
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AuthorForCreationDto {
    #[validate(length(min = 1, max = 50, message = "First name must be between 1 and 50 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50, message = "Last name must be between 1 and 50 characters"))]
    pub last_name: String,

    pub date_of_birth: DateTime<Utc>,

    #[serde(default)]
    pub date_of_death: Option<DateTime<Utc>>,

    #[validate(length(min = 1, max = 50, message = "Main category must be between 1 and 50 characters"))]
    pub main_category: String,
}

impl AuthorForCreationDto {
    /// Turn the request into a new stored author with a fresh id
    pub fn into_author(self) -> Author {
        let author = Author::new(
            self.first_name,
            self.last_name,
            self.date_of_birth,
            self.main_category,
        );
        match self.date_of_death {
            Some(date_of_death) => author.with_date_of_death(date_of_death),
            None => author,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::{FieldValue, Shapeable};
    use chrono::TimeZone;

    fn berry() -> Author {
        Author::new(
            "Berry",
            "Griffin Beak Eldritch",
            Utc.with_ymd_and_hms(1980, 7, 23, 0, 0, 0).unwrap(),
            "Ships",
        )
    }

    #[test]
    fn test_author_dto_projection() {
        let author = berry();
        let now = Utc.with_ymd_and_hms(2024, 7, 22, 12, 0, 0).unwrap();
        let dto = AuthorDto::from_author_at(&author, now);

        assert_eq!(dto.id, author.id);
        assert_eq!(dto.name, "Berry Griffin Beak Eldritch");
        assert_eq!(dto.age, 43);
        assert_eq!(dto.main_category, "Ships");
    }

    #[test]
    fn test_dto_field_names_follow_json_names() {
        assert_eq!(AuthorDto::field_names(), &["id", "name", "age", "mainCategory"]);
        assert_eq!(AuthorDto::resolve_field("MAINCATEGORY"), Some("mainCategory"));
        assert_eq!(AuthorFullDto::resolve_field("dateofbirth"), Some("dateOfBirth"));
        assert!(AuthorDto::resolve_field("main_category").is_none());
    }

    #[test]
    fn test_storage_columns() {
        let author = berry().with_date_of_death(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(
            author.field_value("first_name"),
            Some(FieldValue::String("Berry".to_string()))
        );
        assert!(matches!(
            author.field_value("date_of_death"),
            Some(FieldValue::DateTime(_))
        ));
        assert!(berry().field_value("date_of_death").unwrap().is_null());
    }

    #[test]
    fn test_creation_dto_validation() {
        let valid: AuthorForCreationDto = serde_json::from_value(serde_json::json!({
            "firstName": "Nancy",
            "lastName": "Rye",
            "dateOfBirth": "1978-05-03T00:00:00Z",
            "mainCategory": "Rum"
        }))
        .unwrap();
        assert!(valid.validate().is_ok());

        let author = valid.into_author();
        assert_eq!(author.full_name(), "Nancy Rye");
        assert!(author.date_of_death.is_none());

        let invalid: AuthorForCreationDto = serde_json::from_value(serde_json::json!({
            "firstName": "",
            "lastName": "Rye",
            "dateOfBirth": "1978-05-03T00:00:00Z",
            "mainCategory": "Rum"
        }))
        .unwrap();
        assert!(invalid.validate().is_err());
    }
}
