//! MongoDB persistence adapters.
//!
//! Document shapes mirror the wire records, with the UUID string stored
//! directly as `_id`. Uniqueness checks on users are query-then-insert;
//! unique indexes belong to deployment, matching the no-transaction contract
//! of the rest of the flow.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::{ClientOptions, ReplaceOptions};
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};

use crate::domain::auth::{AuthToken, PasswordDigest};
use crate::domain::notice::{Notice, NoticeId};
use crate::domain::ports::{
    NoticeRepository, NoticeStoreError, PushRegistryError, PushToken, PushTokenRegistry,
    TokenStore, TokenStoreError, UserRepository, UserStoreError,
};
use crate::domain::user::{Batch, Profile, Role, User, UserId};

const NOTICES: &str = "notices";
const USERS: &str = "users";
const TOKENS: &str = "tokens";
const PUSH_TOKENS: &str = "push_tokens";

/// Handle to one MongoDB database, factory for the typed adapters.
#[derive(Clone)]
pub struct MongoPersistence {
    database: Database,
}

impl MongoPersistence {
    /// Connect to the database named in the URL (falling back to the given
    /// default database name).
    pub async fn connect(url: &str, default_db: &str) -> Result<Self, mongodb::error::Error> {
        let options = ClientOptions::parse(url).await?;
        let client = Client::with_options(options)?;
        let name = client
            .default_database()
            .map_or_else(|| default_db.to_owned(), |db| db.name().to_owned());
        Ok(Self {
            database: client.database(&name),
        })
    }

    /// Notice collection adapter.
    #[must_use]
    pub fn notices(&self) -> MongoNoticeRepository {
        MongoNoticeRepository {
            collection: self.database.collection(NOTICES),
        }
    }

    /// User collection adapter.
    #[must_use]
    pub fn users(&self) -> MongoUserRepository {
        MongoUserRepository {
            collection: self.database.collection(USERS),
        }
    }

    /// Bearer-token collection adapter.
    #[must_use]
    pub fn tokens(&self) -> MongoTokenStore {
        MongoTokenStore {
            collection: self.database.collection(TOKENS),
        }
    }

    /// Device push-token collection adapter.
    #[must_use]
    pub fn push_tokens(&self) -> MongoPushTokenRegistry {
        MongoPushTokenRegistry {
            collection: self.database.collection(PUSH_TOKENS),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct NoticeRow {
    #[serde(rename = "_id")]
    id: String,
    title: String,
    notice: String,
    date: DateTime<Utc>,
    time: String,
    user: String,
}

impl From<&Notice> for NoticeRow {
    fn from(value: &Notice) -> Self {
        let record = value.to_record();
        Self {
            id: record.id,
            title: record.title,
            notice: record.notice,
            date: record.date,
            time: record.time,
            user: record.user,
        }
    }
}

impl NoticeRow {
    fn into_notice(self) -> Result<Notice, NoticeStoreError> {
        Notice::from_record(notice_sync::NoticeRecord {
            id: self.id,
            title: self.title,
            notice: self.notice,
            date: self.date,
            time: self.time,
            user: self.user,
        })
        .map_err(|error| NoticeStoreError::query(format!("corrupt notice document: {error}")))
    }
}

/// Notice collection backed by MongoDB.
pub struct MongoNoticeRepository {
    collection: Collection<NoticeRow>,
}

#[async_trait]
impl NoticeRepository for MongoNoticeRepository {
    async fn list(&self) -> Result<Vec<Notice>, NoticeStoreError> {
        let mut cursor = self
            .collection
            .find(doc! {}, None)
            .await
            .map_err(map_notice_error)?;
        let mut notices = Vec::new();
        while let Some(row) = cursor.try_next().await.map_err(map_notice_error)? {
            notices.push(row.into_notice()?);
        }
        Ok(notices)
    }

    async fn find(&self, id: NoticeId) -> Result<Option<Notice>, NoticeStoreError> {
        self.collection
            .find_one(doc! { "_id": id.to_string() }, None)
            .await
            .map_err(map_notice_error)?
            .map(NoticeRow::into_notice)
            .transpose()
    }

    async fn insert(&self, notice: &Notice) -> Result<(), NoticeStoreError> {
        self.collection
            .insert_one(NoticeRow::from(notice), None)
            .await
            .map_err(map_notice_error)?;
        Ok(())
    }

    async fn replace(&self, notice: &Notice) -> Result<bool, NoticeStoreError> {
        let result = self
            .collection
            .replace_one(
                doc! { "_id": notice.id().to_string() },
                NoticeRow::from(notice),
                None,
            )
            .await
            .map_err(map_notice_error)?;
        Ok(result.matched_count > 0)
    }

    async fn remove(&self, id: NoticeId) -> Result<bool, NoticeStoreError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.to_string() }, None)
            .await
            .map_err(map_notice_error)?;
        Ok(result.deleted_count > 0)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct UserRow {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    age: u8,
    role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    batch: Option<Batch>,
    phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    emergency_contact: Option<String>,
    address: String,
    username: String,
    email: String,
    password_salt: String,
    password_digest: String,
}

impl From<&User> for UserRow {
    fn from(value: &User) -> Self {
        let profile = value.profile();
        Self {
            id: value.id().to_string(),
            name: profile.name.clone(),
            age: profile.age,
            role: profile.role,
            batch: profile.batch,
            phone: profile.phone.clone(),
            emergency_contact: profile.emergency_contact.clone(),
            address: profile.address.clone(),
            username: profile.username.clone(),
            email: profile.email.clone(),
            password_salt: value.password().salt().to_owned(),
            password_digest: value.password().digest().to_owned(),
        }
    }
}

impl UserRow {
    fn into_user(self) -> Result<User, UserStoreError> {
        let id = UserId::parse(&self.id)
            .map_err(|error| UserStoreError::query(format!("corrupt user document: {error}")))?;
        let profile = Profile {
            name: self.name,
            age: self.age,
            role: self.role,
            batch: self.batch,
            phone: self.phone,
            emergency_contact: self.emergency_contact,
            address: self.address,
            username: self.username,
            email: self.email,
        };
        let password = PasswordDigest::from_parts(self.password_salt, self.password_digest);
        Ok(User::new(id, profile, password))
    }
}

/// User collection backed by MongoDB.
pub struct MongoUserRepository {
    collection: Collection<UserRow>,
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserStoreError> {
        let username_taken = self
            .collection
            .find_one(doc! { "username": &user.profile().username }, None)
            .await
            .map_err(map_user_error)?
            .is_some();
        if username_taken {
            return Err(UserStoreError::duplicate_username());
        }
        let email_taken = self
            .collection
            .find_one(doc! { "email": &user.profile().email }, None)
            .await
            .map_err(map_user_error)?
            .is_some();
        if email_taken {
            return Err(UserStoreError::duplicate_email());
        }

        self.collection
            .insert_one(UserRow::from(user), None)
            .await
            .map_err(map_user_error)?;
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError> {
        self.collection
            .find_one(doc! { "email": email }, None)
            .await
            .map_err(map_user_error)?
            .map(UserRow::into_user)
            .transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserStoreError> {
        self.collection
            .find_one(doc! { "_id": id.to_string() }, None)
            .await
            .map_err(map_user_error)?
            .map(UserRow::into_user)
            .transpose()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenRow {
    #[serde(rename = "_id")]
    token: String,
    user_id: String,
}

/// Bearer-token table backed by MongoDB.
pub struct MongoTokenStore {
    collection: Collection<TokenRow>,
}

#[async_trait]
impl TokenStore for MongoTokenStore {
    async fn issue(&self, user: UserId) -> Result<AuthToken, TokenStoreError> {
        let token = AuthToken::random();
        self.collection
            .insert_one(
                TokenRow {
                    token: token.as_ref().to_owned(),
                    user_id: user.to_string(),
                },
                None,
            )
            .await
            .map_err(|error| TokenStoreError::storage(error.to_string()))?;
        Ok(token)
    }

    async fn resolve(&self, token: &AuthToken) -> Result<Option<UserId>, TokenStoreError> {
        let row = self
            .collection
            .find_one(doc! { "_id": token.as_ref() }, None)
            .await
            .map_err(|error| TokenStoreError::storage(error.to_string()))?;
        row.map(|row| {
            UserId::parse(&row.user_id)
                .map_err(|error| TokenStoreError::storage(format!("corrupt token document: {error}")))
        })
        .transpose()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PushTokenRow {
    #[serde(rename = "_id")]
    token: String,
}

/// Device push-token registry backed by MongoDB.
pub struct MongoPushTokenRegistry {
    collection: Collection<PushTokenRow>,
}

#[async_trait]
impl PushTokenRegistry for MongoPushTokenRegistry {
    async fn register(&self, token: PushToken) -> Result<(), PushRegistryError> {
        // Keyed on `_id`, so re-registering the same token is an upsert no-op.
        let row = PushTokenRow {
            token: token.as_ref().to_owned(),
        };
        let options = ReplaceOptions::builder().upsert(true).build();
        self.collection
            .replace_one(doc! { "_id": token.as_ref() }, row, options)
            .await
            .map_err(|error| PushRegistryError::storage(error.to_string()))?;
        Ok(())
    }

    async fn all(&self) -> Result<Vec<PushToken>, PushRegistryError> {
        let mut cursor = self
            .collection
            .find(doc! {}, None)
            .await
            .map_err(|error| PushRegistryError::storage(error.to_string()))?;
        let mut tokens = Vec::new();
        while let Some(row) = cursor
            .try_next()
            .await
            .map_err(|error| PushRegistryError::storage(error.to_string()))?
        {
            if let Some(token) = PushToken::new(row.token) {
                tokens.push(token);
            }
        }
        Ok(tokens)
    }
}

fn map_notice_error(error: mongodb::error::Error) -> NoticeStoreError {
    NoticeStoreError::query(error.to_string())
}

fn map_user_error(error: mongodb::error::Error) -> UserStoreError {
    UserStoreError::query(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notice::NoticeDraft;
    use chrono::TimeZone;
    use notice_sync::NoticeDraftRecord;

    fn notice() -> Notice {
        NoticeDraft::from_record(NoticeDraftRecord {
            title: "Exam".to_owned(),
            notice: "Hall 3".to_owned(),
            date: Utc.with_ymd_and_hms(2024, 9, 20, 0, 0, 0).single().expect("valid date"),
            time: "9:00 AM".to_owned(),
            user: "u1".to_owned(),
        })
        .expect("draft validates")
        .into_notice(NoticeId::random())
    }

    #[test]
    fn notice_rows_round_trip() {
        let stored = notice();
        let row = NoticeRow::from(&stored);
        assert_eq!(row.id, stored.id().to_string());
        let back = row.into_notice().expect("row rehydrates");
        assert_eq!(back, stored);
    }

    #[test]
    fn corrupt_notice_rows_surface_as_query_errors() {
        let row = NoticeRow {
            id: "not-a-uuid".to_owned(),
            title: "Exam".to_owned(),
            notice: "Hall 3".to_owned(),
            date: Utc::now(),
            time: "9:00 AM".to_owned(),
            user: "u1".to_owned(),
        };
        assert!(matches!(
            row.into_notice(),
            Err(NoticeStoreError::Query { .. })
        ));
    }

    #[test]
    fn user_rows_keep_the_password_digest_fields() {
        let user = User::new(
            UserId::random(),
            Profile {
                name: "Priya Nair".to_owned(),
                age: 34,
                role: Role::Teacher,
                batch: None,
                phone: "555-0101".to_owned(),
                emergency_contact: None,
                address: "4 Staff Lane".to_owned(),
                username: "priya".to_owned(),
                email: "priya@example.edu".to_owned(),
            },
            PasswordDigest::derive("correct horse"),
        );
        let row = UserRow::from(&user);
        let back = row.into_user().expect("row rehydrates");
        assert_eq!(back, user);
        assert!(back.password().matches("correct horse"));
    }
}
