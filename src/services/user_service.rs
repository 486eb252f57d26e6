// ==================== USERS SERVICE ====================
// Paginated listing, lookup and creation of users in MongoDB.
// Email uniqueness is delegated to the unique index on users(email).

use crate::{database::MongoDB, models::User, utils::error::{is_duplicate_key, AppError}};
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

// ==================== REQUEST/RESPONSE MODELS ====================

// Fields default to empty so a body with a missing field still reaches
// validation and gets a per-field message instead of a deserialize error.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub birthday: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UsersPage {
    pub data: Vec<User>,
    pub total: u64,
    pub current_page: u64,
    pub pages: u64,
}

// ==================== SERVICE FUNCTIONS ====================

/// GET /get-users - Paginated users with optional case-insensitive search
/// over name, email and phone. Requesting a page past the end returns the
/// last page instead of an empty window.
pub async fn list_users(
    db: &MongoDB,
    page: u64,
    limit: u64,
    search: Option<&str>,
) -> Result<UsersPage, AppError> {
    let collection = db.collection::<User>("users");

    let filter = build_search_filter(search);

    let total = collection
        .count_documents(filter.clone())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let (pages, current_page) = pagination_window(total, page, limit);

    let options = mongodb::options::FindOptions::builder()
        .skip((current_page - 1) * limit)
        .limit(limit as i64)
        .build();

    let mut cursor = collection
        .find(filter)
        .with_options(options)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let mut data = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(user) => data.push(user),
            Err(e) => log::error!("Error reading user document: {}", e),
        }
    }

    Ok(UsersPage {
        data,
        total,
        current_page,
        pages,
    })
}

/// GET /get-user/{id} - Single user lookup. A malformed id is reported the
/// same way as a missing document.
pub async fn get_user_by_id(db: &MongoDB, id: &str) -> Result<User, AppError> {
    let oid = ObjectId::parse_str(id)
        .map_err(|_| AppError::NotFound(format!("User {} not found", id)))?;

    let collection = db.collection::<User>("users");

    collection
        .find_one(doc! { "_id": oid })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
}

/// POST /add-user - Validates and inserts a new user. A duplicate email is
/// surfaced as a Conflict; any other write failure is logged and surfaced
/// as a generic database error.
pub async fn create_user(db: &MongoDB, request: CreateUserRequest) -> Result<User, AppError> {
    let errors = validate_new_user(&request);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let mut user = User {
        id: None,
        name: request.name,
        email: request.email,
        phone: request.phone,
        birthday: request.birthday,
    };

    let collection = db.collection::<User>("users");

    match collection.insert_one(&user).await {
        Ok(result) => {
            user.id = result.inserted_id.as_object_id();
            Ok(user)
        }
        Err(e) if is_duplicate_key(&e) => Err(AppError::Conflict {
            field: "email".to_string(),
            value: user.email,
        }),
        Err(e) => {
            log::error!("❌ Failed to insert user: {}", e);
            Err(AppError::Database(e.to_string()))
        }
    }
}

/// Count all users.
pub async fn count_users(db: &MongoDB) -> Result<u64, AppError> {
    let collection = db.collection::<User>("users");

    collection
        .count_documents(doc! {})
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Unordered bulk insert: records that fail (e.g. a duplicate email) do not
/// prevent the rest of the batch from being attempted. Returns the number of
/// documents actually inserted.
pub async fn bulk_create(db: &MongoDB, users: &[User]) -> Result<usize, AppError> {
    let collection = db.collection::<User>("users");

    match collection.insert_many(users).ordered(false).await {
        Ok(result) => Ok(result.inserted_ids.len()),
        Err(e) => Err(AppError::Database(e.to_string())),
    }
}

// ==================== PURE HELPERS ====================

/// Builds the `$or` regex filter for a search term, or an empty filter when
/// no term is given. The term is escaped so it matches literally.
fn build_search_filter(search: Option<&str>) -> Document {
    match search {
        Some(term) if !term.is_empty() => {
            let escaped = escape_regex(term);
            doc! {
                "$or": [
                    { "name": { "$regex": &escaped, "$options": "i" } },
                    { "email": { "$regex": &escaped, "$options": "i" } },
                    { "phone": { "$regex": &escaped, "$options": "i" } },
                ]
            }
        }
        _ => doc! {},
    }
}

/// Total page count (never 0) and the requested page clamped down to the
/// last available one. `limit` must be >= 1.
pub fn pagination_window(total: u64, page: u64, limit: u64) -> (u64, u64) {
    let pages = ((total + limit - 1) / limit).max(1);
    let current_page = page.max(1).min(pages);
    (pages, current_page)
}

/// Escapes regex metacharacters so a search term is treated as a literal
/// substring by the MongoDB `$regex` operator.
pub fn escape_regex(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(
            c,
            '.' | '*' | '+' | '?' | '^' | '$' | '{' | '}' | '(' | ')' | '|' | '[' | ']' | '\\'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Field-level validation for a new user. Returns every failing message so
/// the caller sees all problems at once.
pub fn validate_new_user(request: &CreateUserRequest) -> Vec<String> {
    let mut errors = Vec::new();

    if request.name.trim().is_empty() {
        errors.push("Name is required".to_string());
    }
    if request.email.trim().is_empty() {
        errors.push("Email is required".to_string());
    } else if !is_valid_email(&request.email) {
        errors.push("Email is invalid".to_string());
    }
    if request.phone.trim().is_empty() {
        errors.push("Phone number is required".to_string());
    }
    if request.birthday.trim().is_empty() {
        errors.push("Birthday is required".to_string());
    }

    errors
}

/// Minimal syntactic email check: one `@`, non-empty local part, dotted
/// domain, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.len() >= 3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_is_ceil_with_minimum_one() {
        assert_eq!(pagination_window(0, 1, 10), (1, 1));
        assert_eq!(pagination_window(1, 1, 10), (1, 1));
        assert_eq!(pagination_window(10, 1, 10), (1, 1));
        assert_eq!(pagination_window(11, 1, 10), (2, 1));
        assert_eq!(pagination_window(25, 3, 10), (3, 3));
    }

    #[test]
    fn page_past_the_end_clamps_to_last_page() {
        // 25 records, limit 10 -> 3 pages; page 7 behaves like page 3
        assert_eq!(pagination_window(25, 7, 10), (3, 3));
        // empty store always resolves to page 1
        assert_eq!(pagination_window(0, 5, 10), (1, 1));
    }

    #[test]
    fn page_zero_is_treated_as_first_page() {
        assert_eq!(pagination_window(25, 0, 10), (3, 1));
    }

    #[test]
    fn escape_regex_makes_metacharacters_literal() {
        assert_eq!(escape_regex("a.b"), "a\\.b");
        assert_eq!(escape_regex("+380"), "\\+380");
        assert_eq!(escape_regex("(jane|doe)"), "\\(jane\\|doe\\)");
        assert_eq!(escape_regex("plain"), "plain");
        assert_eq!(escape_regex("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn search_filter_targets_name_email_and_phone() {
        let filter = build_search_filter(Some("a.b"));
        let or = filter.get_array("$or").unwrap();
        assert_eq!(or.len(), 3);

        // every branch matches case-insensitively on the escaped term
        for (branch, field) in or.iter().zip(["name", "email", "phone"]) {
            let condition = branch.as_document().unwrap().get_document(field).unwrap();
            assert_eq!(condition.get_str("$regex").unwrap(), "a\\.b");
            assert_eq!(condition.get_str("$options").unwrap(), "i");
        }

        // no term or empty term -> match everything
        assert!(build_search_filter(None).is_empty());
        assert!(build_search_filter(Some("")).is_empty());
    }

    #[test]
    fn validation_reports_every_missing_field() {
        let request = CreateUserRequest {
            name: "".to_string(),
            email: "".to_string(),
            phone: " ".to_string(),
            birthday: "".to_string(),
        };
        let errors = validate_new_user(&request);
        assert_eq!(
            errors,
            vec![
                "Name is required",
                "Email is required",
                "Phone number is required",
                "Birthday is required",
            ]
        );
    }

    #[test]
    fn validation_accepts_a_complete_user() {
        let request = CreateUserRequest {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "+380123456789".to_string(),
            birthday: "01-01-1990".to_string(),
        };
        assert!(validate_new_user(&request).is_empty());
    }

    #[test]
    fn validation_flags_malformed_email() {
        let request = CreateUserRequest {
            name: "Jane Doe".to_string(),
            email: "not-an-email".to_string(),
            phone: "+380123456789".to_string(),
            birthday: "01-01-1990".to_string(),
        };
        assert_eq!(validate_new_user(&request), vec!["Email is invalid"]);
    }

    #[test]
    fn body_with_missing_fields_still_gets_field_messages() {
        // serde fills absent fields with empty strings, so the request
        // reaches validation instead of dying in the JSON extractor
        let request: CreateUserRequest = serde_json::from_str(
            r#"{"email":"jane@example.com","phone":"+380123456789","birthday":"01-01-1990"}"#,
        )
        .unwrap();
        assert_eq!(request.name, "");
        assert_eq!(validate_new_user(&request), vec!["Name is required"]);

        let empty: CreateUserRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(
            validate_new_user(&empty),
            vec![
                "Name is required",
                "Email is required",
                "Phone number is required",
                "Birthday is required",
            ]
        );
    }

    #[test]
    fn email_syntax_check() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email("jane.doe@mail.example.org"));
        assert!(!is_valid_email("jane"));
        assert!(!is_valid_email("jane@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("jane doe@example.com"));
        assert!(!is_valid_email("jane@@example.com"));
        assert!(!is_valid_email("jane@.com"));
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn duplicate_email_returns_conflict() {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/UserServiceTest".to_string());
        let db = crate::database::MongoDB::new(&uri).await.unwrap();

        let request = || CreateUserRequest {
            name: "Jane Doe".to_string(),
            email: "jane.conflict@example.com".to_string(),
            phone: "+380123456789".to_string(),
            birthday: "01-01-1990".to_string(),
        };

        let first = create_user(&db, request()).await.unwrap();
        assert!(first.id.is_some());

        let second = create_user(&db, request()).await;
        assert!(matches!(
            second,
            Err(AppError::Conflict { ref field, .. }) if field == "email"
        ));
    }
}
