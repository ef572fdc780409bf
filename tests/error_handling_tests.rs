//! Tests for error mapping: status codes, error codes and response bodies

use axum::http::StatusCode;
use axum::response::IntoResponse;
use shape::core::error::FieldValidationError;
use shape::prelude::*;

fn not_found(id: Uuid) -> ShapeError {
    EntityError::NotFound {
        entity_type: "author".to_string(),
        id,
    }
    .into()
}

// =============================================================================
// Status Code Tests
// =============================================================================

mod status_code_tests {
    use super::*;

    #[test]
    fn test_entity_not_found_returns_404() {
        assert_eq!(not_found(Uuid::nil()).status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_entity_already_exists_returns_409() {
        let err: ShapeError = EntityError::AlreadyExists {
            entity_type: "author".to_string(),
            id: Uuid::nil(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_caller_input_errors_return_400() {
        let errors: Vec<ShapeError> = vec![
            ValidationError::InvalidOrderBy {
                order_by: "shoeSize".to_string(),
            }
            .into(),
            ValidationError::UnknownFields {
                resource: "AuthorDto",
                fields: "id,shoeSize".to_string(),
            }
            .into(),
            ValidationError::InvalidPageSize { page_size: 0 }.into(),
            ValidationError::InvalidPageNumber { page_number: -1 }.into(),
            ValidationError::InvalidUuid {
                value: "abc".to_string(),
            }
            .into(),
            SortError::MissingKeyMapping {
                field: "shoeSize".to_string(),
            }
            .into(),
        ];

        for err in errors {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST, "{err}");
            assert!(err.is_client_error());
        }
    }

    #[test]
    fn test_configuration_and_storage_errors_return_500() {
        let errors: Vec<ShapeError> = vec![
            ConfigError::MissingMapping {
                public_type: "AuthorDto",
                storage_type: "Author",
            }
            .into(),
            ConfigError::EmptyMappingEntry {
                field: "name".to_string(),
            }
            .into(),
            StorageError::UnknownColumn {
                entity_type: "Author",
                column: "shoe_size".to_string(),
            }
            .into(),
            ShapeError::Internal("boom".to_string()),
        ];

        for err in errors {
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR, "{err}");
            assert!(!err.is_client_error());
        }
    }
}

// =============================================================================
// Error Code Tests
// =============================================================================

mod error_code_tests {
    use super::*;

    #[test]
    fn test_entity_error_codes() {
        assert_eq!(not_found(Uuid::nil()).error_code(), "ENTITY_NOT_FOUND");
        let err: ShapeError = EntityError::AlreadyExists {
            entity_type: "author".to_string(),
            id: Uuid::nil(),
        }
        .into();
        assert_eq!(err.error_code(), "ENTITY_ALREADY_EXISTS");
    }

    #[test]
    fn test_projection_error_codes() {
        let order_by: ShapeError = ValidationError::InvalidOrderBy {
            order_by: "x".to_string(),
        }
        .into();
        let sort: ShapeError = SortError::MissingKeyMapping {
            field: "x".to_string(),
        }
        .into();
        let mapping: ShapeError = ConfigError::DuplicateMapping {
            public_type: "AuthorDto",
            storage_type: "Author",
        }
        .into();
        let storage: ShapeError = StorageError::LockPoisoned {
            kind: "read",
            message: "poisoned".to_string(),
        }
        .into();

        assert_eq!(order_by.error_code(), "INVALID_ORDER_BY");
        assert_eq!(sort.error_code(), "SORT_KEY_MAPPING_MISSING");
        assert_eq!(mapping.error_code(), "MAPPING_ALREADY_REGISTERED");
        assert_eq!(storage.error_code(), "STORAGE_ERROR");
    }

    #[test]
    fn test_negotiation_and_duplicate_field_codes() {
        let not_acceptable = ShapeError::NotAcceptable {
            media_type: "text/html".to_string(),
        };
        let duplicate: ShapeError = ValidationError::DuplicateFields {
            resource: "AuthorDto",
            fields: "id,ID".to_string(),
        }
        .into();

        assert_eq!(not_acceptable.error_code(), "NOT_ACCEPTABLE");
        assert_eq!(duplicate.error_code(), "DUPLICATE_FIELDS");
        assert_eq!(duplicate.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_file_errors_share_config_code() {
        let err: ShapeError = ConfigError::FileNotFound {
            path: "listing.yaml".to_string(),
        }
        .into();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }
}

// =============================================================================
// Error Response Tests
// =============================================================================

mod error_response_tests {
    use super::*;

    #[test]
    fn test_missing_key_mapping_message() {
        let err: ShapeError = SortError::MissingKeyMapping {
            field: "shoeSize".to_string(),
        }
        .into();

        let response = err.to_response();

        assert_eq!(response.message, "Key mapping for shoeSize is missing.");
        assert!(response.details.is_none());
    }

    #[test]
    fn test_not_found_includes_details() {
        let id = Uuid::new_v4();
        let response = not_found(id).to_response();

        assert_eq!(response.code, "ENTITY_NOT_FOUND");
        let details = response.details.unwrap();
        assert_eq!(details["entity_type"], "author");
        assert_eq!(details["id"], id.to_string());
    }

    #[test]
    fn test_unknown_fields_names_the_resource() {
        let err: ShapeError = ValidationError::UnknownFields {
            resource: "AuthorDto",
            fields: "id,shoeSize".to_string(),
        }
        .into();

        let response = err.to_response();

        assert_eq!(
            response.message,
            "Not all requested data shaping fields exist on the resource AuthorDto: id,shoeSize"
        );
        assert_eq!(response.details.unwrap()["resource"], "AuthorDto");
    }

    #[test]
    fn test_validation_errors_include_field_details() {
        let err = ShapeError::Validation(ValidationError::FieldErrors(vec![
            FieldValidationError {
                field: "first_name".to_string(),
                message: "length".to_string(),
            },
            FieldValidationError {
                field: "last_name".to_string(),
                message: "length".to_string(),
            },
        ]));

        let details = err.to_response().details.unwrap();
        let fields = details["fields"].as_array().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0]["field"], "first_name");
    }

    #[test]
    fn test_error_response_skips_empty_details() {
        let err: ShapeError = ValidationError::InvalidPageSize { page_size: 0 }.into();
        let json = serde_json::to_value(err.to_response()).unwrap();

        assert_eq!(json["code"], "INVALID_PAGE_SIZE");
        assert!(json.get("details").is_none());
    }
}

// =============================================================================
// Error Conversion Tests
// =============================================================================

mod error_conversion_tests {
    use super::*;

    #[test]
    fn test_serde_json_error_becomes_invalid_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ShapeError = json_err.into();

        assert!(matches!(
            err,
            ShapeError::Validation(ValidationError::InvalidJson { .. })
        ));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_yaml_error_becomes_config_parse_error() {
        let yaml_err = serde_yaml::from_str::<ListingConfig>("max_page_size: [").unwrap_err();
        let err: ShapeError = yaml_err.into();

        assert!(matches!(
            err,
            ShapeError::Config(ConfigError::ParseError { file: None, .. })
        ));
    }
}

// =============================================================================
// IntoResponse Tests
// =============================================================================

mod into_response_tests {
    use super::*;

    #[test]
    fn test_not_found_into_response_status() {
        let response = not_found(Uuid::new_v4()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_sort_error_into_response_status() {
        let err: ShapeError = SortError::MissingKeyMapping {
            field: "x".to_string(),
        }
        .into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_acceptable_into_response_status() {
        let err = ShapeError::NotAcceptable {
            media_type: "text/html".to_string(),
        };
        assert_eq!(err.into_response().status(), StatusCode::NOT_ACCEPTABLE);
    }

    #[test]
    fn test_missing_mapping_into_response_status() {
        let err: ShapeError = ConfigError::MissingMapping {
            public_type: "AuthorDto",
            storage_type: "Author",
        }
        .into();
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
