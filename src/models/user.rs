use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A user document in the `users` collection. `email` carries a unique index;
/// `birthday` is stored as a DD-MM-YYYY string.
#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub birthday: String,
}
