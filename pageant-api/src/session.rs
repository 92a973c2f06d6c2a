//! The persisted session and the store keys it lives under.
use pageant_common::store::Store;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Store key of the short-lived access token.
pub const ACCESS_TOKEN: &str = "access_token";
/// Store key of the refresh token.
pub const REFRESH_TOKEN: &str = "refresh_token";
/// Store key of the JSON-serialized user blob.
pub const USER: &str = "user";

/// A logged-in session as kept in the durable store.
///
/// `access_token` is replaced in place on every refresh. The whole store is
/// cleared on logout or when the backend rejects the refresh token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Opaque user record returned by the login endpoint.
    #[serde(default)]
    pub user: Value,
}

impl Session {
    /// Read the session from `store`.
    ///
    /// Returns `None` unless both tokens are present. A missing or malformed
    /// `user` entry reads as JSON `null`.
    pub async fn load<S>(store: &S) -> Result<Option<Self>, S::Error>
    where
        S: Store<String, String> + Sync,
    {
        let Some(access_token) = store.get(&ACCESS_TOKEN.into()).await? else {
            return Ok(None);
        };
        let Some(refresh_token) = store.get(&REFRESH_TOKEN.into()).await? else {
            return Ok(None);
        };
        let user = store
            .get(&USER.into())
            .await?
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or(Value::Null);
        Ok(Some(Self { access_token, refresh_token, user }))
    }
    /// Write every field of the session to `store`.
    pub async fn save<S>(&self, store: &S) -> Result<(), S::Error>
    where
        S: Store<String, String> + Sync,
    {
        store.set(ACCESS_TOKEN.into(), self.access_token.clone()).await?;
        store.set(REFRESH_TOKEN.into(), self.refresh_token.clone()).await?;
        store.set(USER.into(), self.user.to_string()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pageant_common::store::memory::MemoryStore;
    use serde_json::json;

    fn session() -> Session {
        Session {
            access_token: "access".into(),
            refresh_token: "refresh".into(),
            user: json!({ "id": 7, "username": "organizer", "email": "o@example.com" }),
        }
    }

    #[tokio::test]
    async fn save_then_load() {
        let store = MemoryStore::<String, String>::default();
        session().save(&store).await.expect("save should succeed");
        assert_eq!(
            store.get(&USER.into()).await.expect("get"),
            Some(r#"{"email":"o@example.com","id":7,"username":"organizer"}"#.into())
        );
        assert_eq!(Session::load(&store).await.expect("load"), Some(session()));
    }

    #[tokio::test]
    async fn load_requires_both_tokens() {
        let store = MemoryStore::<String, String>::default();
        assert_eq!(Session::load(&store).await.expect("load"), None);
        store.set(REFRESH_TOKEN.into(), "refresh".into()).await.expect("set");
        assert_eq!(Session::load(&store).await.expect("load"), None);
    }

    #[tokio::test]
    async fn load_tolerates_bad_user_blob() {
        let store = MemoryStore::<String, String>::default();
        store.set(ACCESS_TOKEN.into(), "a".into()).await.expect("set");
        store.set(REFRESH_TOKEN.into(), "r".into()).await.expect("set");
        store.set(USER.into(), "{not json".into()).await.expect("set");
        let loaded = Session::load(&store).await.expect("load").expect("session");
        assert_eq!(loaded.user, Value::Null);
    }
}
