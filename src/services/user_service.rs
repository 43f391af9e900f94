use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{non_empty, not_found, search_query, SearchParams};
use crate::api::validate::{is_plausible_email, is_valid_password, FieldErrors, PASSWORD_SPECIALS};
use crate::api::{AuthRequest, NewUserRequest, RecordCreationResponse, UserResponse};
use crate::auth::password::{hash_password, verify_password};
use crate::database::models::{User, UserRow};
use crate::database::store::UserStore;
use crate::error::ApiError;
use crate::search::EntitySearcher;

pub const USERNAME_MIN_LENGTH: usize = 4;
pub const AUTH_USERNAME_MIN_LENGTH: usize = 3;
const INVALID_CREDENTIALS: &str = "Invalid username or password";

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    searcher: EntitySearcher,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, searcher: EntitySearcher) -> Self {
        Self { store, searcher }
    }

    pub async fn find_all(&self) -> Result<Vec<UserResponse>, ApiError> {
        debug!("Listing users");
        let users = self.store.list_users().await?;
        Ok(users.iter().map(UserResponse::from).collect())
    }

    pub async fn find_one(&self, id: Uuid) -> Result<UserResponse, ApiError> {
        debug!("Fetching user {}", id);
        let user = self.store.get_user(id).await?.ok_or_else(|| not_found("User", id))?;
        Ok(UserResponse::from(&user))
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool, ApiError> {
        Ok(self.store.get_user(id).await?.is_some())
    }

    pub async fn search(&self, params: &SearchParams) -> Result<Vec<UserResponse>, ApiError> {
        debug!("Searching users by {:?}", params.keys().collect::<Vec<_>>());
        let users = match search_query::<User>(&self.searcher, params)? {
            None => return self.find_all().await,
            Some(query) => self.store.search_users(&query).await?,
        };
        Ok(non_empty(users, "user")?.iter().map(UserResponse::from).collect())
    }

    pub async fn create(&self, request: NewUserRequest) -> Result<RecordCreationResponse, ApiError> {
        FieldErrors::new()
            .min_length("username", &request.username, USERNAME_MIN_LENGTH)
            .check(
                "password",
                is_valid_password(&request.password),
                format!(
                    "Must be at least 8 characters with a lowercase letter, an uppercase letter, a digit and one of {}",
                    PASSWORD_SPECIALS
                ),
            )
            .required("email", &request.email)
            .check("email", is_plausible_email(&request.email), "Must be a valid email address")
            .required("firstName", &request.first_name)
            .required("lastName", &request.last_name)
            .required("roleName", &request.role_name)
            .into_result()?;

        if self.store.find_user_by_username(&request.username).await?.is_some() {
            return Err(ApiError::conflict("That username is taken"));
        }
        if self.store.find_user_by_email(&request.email).await?.is_some() {
            return Err(ApiError::conflict("That email address is already associated with another user"));
        }

        let role = self
            .store
            .find_role_by_name(&request.role_name)
            .await?
            .ok_or_else(|| ApiError::bad_request(format!("Unknown role: {}", request.role_name)))?;

        let password = hash_password(&request.password).await?;
        let id = Uuid::new_v4();
        self.store
            .insert_user(UserRow {
                id,
                username: request.username.clone(),
                email: request.email,
                first_name: request.first_name,
                last_name: request.last_name,
                password,
                role: role.id,
            })
            .await?;

        info!("Created user {} ({})", request.username, id);
        Ok(RecordCreationResponse { id })
    }

    pub async fn authenticate(&self, request: AuthRequest) -> Result<UserResponse, ApiError> {
        FieldErrors::new()
            .min_length("username", &request.username, AUTH_USERNAME_MIN_LENGTH)
            .required("password", &request.password)
            .into_result()?;

        let Some(user) = self.store.find_user_by_username(&request.username).await? else {
            warn!("Authentication failed: unknown user {}", request.username);
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(&request.password, &user.password_hash).await? {
            warn!("Authentication failed: wrong password for {}", request.username);
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }

        info!("User {} authenticated", user.username);
        Ok(UserResponse::from(&user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MemoryStore};

    async fn service() -> (UserService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::seeded().await);
        (UserService::new(store.clone(), EntitySearcher::new(10)), store)
    }

    fn new_user(username: &str, email: &str) -> NewUserRequest {
        NewUserRequest {
            username: username.to_string(),
            password: "Str0ng!Pass".to_string(),
            email: email.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            role_name: "admin".to_string(),
        }
    }

    #[tokio::test]
    async fn creates_and_fetches_a_user() {
        let (users, _) = service().await;
        let created = users.create(new_user("ada", "ada@example.com")).await;
        assert!(matches!(created, Err(ApiError::ValidationError { .. })), "username too short");

        let created = users.create(new_user("lovelace", "ada@example.com")).await.unwrap();
        let fetched = users.find_one(created.id).await.unwrap();
        assert_eq!(fetched.username, "lovelace");
        assert_eq!(fetched.role.role_name, "admin");
    }

    #[tokio::test]
    async fn duplicate_username_and_email_conflict() {
        let (users, _) = service().await;
        let err = users.create(new_user("test", "fresh@example.com")).await.unwrap_err();
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.message(), "That username is taken");

        let err = users.create(new_user("fresh", "test@test.com")).await.unwrap_err();
        assert_eq!(err.message(), "That email address is already associated with another user");
    }

    #[tokio::test]
    async fn weak_password_and_unknown_role_are_rejected() {
        let (users, _) = service().await;
        let mut weak = new_user("lovelace", "ada@example.com");
        weak.password = "password".to_string();
        assert_eq!(users.create(weak).await.unwrap_err().status_code(), 400);

        let mut unknown_role = new_user("lovelace", "ada@example.com");
        unknown_role.role_name = "wizard".to_string();
        let err = users.create(unknown_role).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.message(), "Unknown role: wizard");
    }

    #[tokio::test]
    async fn authenticates_with_the_right_password_only() {
        let (users, _) = service().await;
        let ok = users
            .authenticate(AuthRequest { username: "test".into(), password: "P@ssword1".into() })
            .await
            .unwrap();
        assert_eq!(ok.email, "test@test.com");

        for (username, password) in [("test", "wrong"), ("nobody", "P@ssword1")] {
            let err = users
                .authenticate(AuthRequest { username: username.into(), password: password.into() })
                .await
                .unwrap_err();
            assert_eq!(err.status_code(), 401);
            assert_eq!(err.message(), "Invalid username or password");
        }
    }

    #[tokio::test]
    async fn search_rules() {
        let (users, store) = service().await;
        store.add_user(&fixtures::user("second", "second@example.com")).await;

        let all = users.search(&SearchParams::new()).await.unwrap();
        assert_eq!(all.len(), 2);

        let params: SearchParams = [("email".to_string(), "second@example.com".to_string())].into();
        assert_eq!(users.search(&params).await.unwrap()[0].username, "second");

        let params: SearchParams = [("role.roleName".to_string(), "admin".to_string())].into();
        assert_eq!(users.search(&params).await.unwrap().len(), 2);

        let params: SearchParams = [("email".to_string(), "nobody@example.com".to_string())].into();
        assert_eq!(users.search(&params).await.unwrap_err().status_code(), 404);

        let params: SearchParams = [("password".to_string(), "x".to_string())].into();
        let err = users.search(&params).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.message(), "Attribute password does not exist on entity User");
    }
}
