use serde::de::IgnoredAny;
use types::{Page, PageQuery, Result, SetPassword, User, UserPayload};

use crate::{ApiClient, endpoints};

/// User administration.
impl ApiClient {
    pub async fn list_users(&self, query: &PageQuery) -> Result<Page<User>> {
        self.call(self.get(endpoints::USERS)?.query(&query.to_pairs()))
            .await
    }

    pub async fn create_user(&self, user: &UserPayload) -> Result<()> {
        self.call::<IgnoredAny>(self.post(endpoints::USERS)?.json(user))
            .await
            .map(|_| ())
    }

    pub async fn update_user(&self, id: i64, user: &UserPayload) -> Result<()> {
        self.call::<IgnoredAny>(self.patch(endpoints::item(endpoints::USERS, id))?.json(user))
            .await
            .map(|_| ())
    }

    pub async fn delete_user(&self, id: i64) -> Result<()> {
        self.call::<IgnoredAny>(self.delete(endpoints::item(endpoints::USERS, id))?)
            .await
            .map(|_| ())
    }

    /// Flip the user's active flag.
    pub async fn toggle_user_status(&self, id: i64) -> Result<()> {
        self.user_action(id, "toggle_status").await
    }

    pub async fn restore_user(&self, id: i64) -> Result<()> {
        self.user_action(id, "restore").await
    }

    pub async fn change_user_password(&self, id: i64, password: &SetPassword) -> Result<()> {
        let path = endpoints::action(endpoints::USERS, id, "change_password");
        self.call::<IgnoredAny>(self.post(path)?.json(password))
            .await
            .map(|_| ())
    }

    async fn user_action(&self, id: i64, action: &str) -> Result<()> {
        let path = endpoints::action(endpoints::USERS, id, action);
        self.call::<IgnoredAny>(self.post(path)?).await.map(|_| ())
    }
}
