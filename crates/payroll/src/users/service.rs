//! User account operations and credential checks.

use common::protocol::{Role, User, UserAddRequest};
use common::validation::{require_non_empty, require_not_null, require_positive};
use common::{ErrorReason, ServiceError};
use tracing::{debug, error, info};

use super::password::PasswordEncoder;
use super::store::{NewUser, StoreError, UserRecord, UserStore};

/// Username of the account created at startup. It can never be deleted.
pub const ADMIN_USERNAME: &str = "admin";

#[derive(Clone, Debug)]
pub struct UserService {
    store: UserStore,
    encoder: PasswordEncoder,
}

impl UserService {
    pub fn new(store: UserStore, encoder: PasswordEncoder) -> Self {
        Self { store, encoder }
    }

    /// All users. Password hashes are never returned.
    pub async fn retrieve_users(&self) -> Vec<User> {
        self.store.find_all().await.into_iter().map(to_dto).collect()
    }

    /// One user by id.
    ///
    /// # Errors
    ///
    /// - `UserIdNegative` (400) if `id <= 0`.
    /// - `GetUserNotFound` (404) if no such user exists.
    pub async fn get_user(&self, id: i64) -> Result<User, ServiceError> {
        let id = require_positive(Some(id), ErrorReason::UserIdNegative)?;
        self.store
            .find_by_id(id)
            .await
            .map(to_dto)
            .ok_or(ServiceError::NotFound(ErrorReason::GetUserNotFound))
    }

    /// Validate, hash the password, and store a new user.
    ///
    /// Checks run in order username, password, role.
    pub async fn save_user(&self, user: UserAddRequest) -> Result<i64, ServiceError> {
        let username = require_non_empty(user.username.as_deref(), ErrorReason::UserUsernameEmpty)?;
        let password = require_non_empty(user.password.as_deref(), ErrorReason::UserPasswordEmpty)?;
        let role = require_not_null(user.role, ErrorReason::UserRoleEmpty)?;

        let password_hash = self.encoder.hash(password).map_err(|e| {
            error!(error = %e, "password hashing failed");
            ServiceError::Internal(ErrorReason::PasswordHashFailed)
        })?;

        let id = self
            .store
            .insert(NewUser {
                username: username.to_owned(),
                password_hash,
                role,
            })
            .await
            .map_err(|StoreError::UsernameTaken(_)| {
                ServiceError::BadRequest(ErrorReason::UserUsernameExist)
            })?;
        debug!(user_id = id, ?role, "user saved");
        Ok(id)
    }

    /// Delete a user; deleting a missing id succeeds.
    ///
    /// # Errors
    ///
    /// - `UserIdNegative` (400) if `id <= 0`.
    /// - `UserDeleteAdmin` (400) if `id` names the admin account.
    pub async fn delete_user(&self, id: i64) -> Result<(), ServiceError> {
        let id = require_positive(Some(id), ErrorReason::UserIdNegative)?;
        if let Some(rec) = self.store.find_by_id(id).await {
            if rec.username == ADMIN_USERNAME {
                return Err(ServiceError::BadRequest(ErrorReason::UserDeleteAdmin));
            }
        }
        self.store.delete(id).await;
        debug!(user_id = id, "user deleted");
        Ok(())
    }

    /// Create the admin account with `password` unless it already exists.
    ///
    /// # Errors
    ///
    /// Any failure other than the account already existing.
    pub async fn ensure_admin(&self, password: &str) -> Result<(), ServiceError> {
        let request = UserAddRequest {
            username: Some(ADMIN_USERNAME.to_owned()),
            password: Some(password.to_owned()),
            role: Some(Role::Administrator),
        };
        match self.save_user(request).await {
            Ok(id) => {
                info!(user_id = id, "admin user created");
                Ok(())
            }
            Err(ServiceError::BadRequest(ErrorReason::UserUsernameExist)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// The role of the user whose credentials match, if any.
    pub async fn authenticate(&self, username: &str, password: &str) -> Option<Role> {
        let rec = self.store.find_by_username(username).await?;
        self.encoder
            .verify(password, &rec.password_hash)
            .then_some(rec.role)
    }
}

fn to_dto(rec: UserRecord) -> User {
    User {
        id: rec.id,
        username: rec.username,
        role: rec.role,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> UserService {
        UserService::new(UserStore::new(), PasswordEncoder::fast())
    }

    fn add_request(username: &str, password: &str, role: Option<Role>) -> UserAddRequest {
        UserAddRequest {
            username: Some(username.into()),
            password: Some(password.into()),
            role,
        }
    }

    #[tokio::test]
    async fn save_then_authenticate() {
        let svc = service();
        let id = svc
            .save_user(add_request("john.vick", "5CwTbz_Ag$Z!", Some(Role::Editor)))
            .await
            .unwrap();
        assert_eq!(
            svc.get_user(id).await.unwrap(),
            User {
                id,
                username: "john.vick".into(),
                role: Role::Editor
            }
        );
        assert_eq!(svc.authenticate("john.vick", "5CwTbz_Ag$Z!").await, Some(Role::Editor));
        assert_eq!(svc.authenticate("john.vick", "wrong").await, None);
        assert_eq!(svc.authenticate("nobody", "5CwTbz_Ag$Z!").await, None);
    }

    #[tokio::test]
    async fn password_is_stored_hashed() {
        let store = UserStore::new();
        let svc = UserService::new(store.clone(), PasswordEncoder::fast());
        let id = svc
            .save_user(add_request("john.vick", "plain-secret", Some(Role::Viewer)))
            .await
            .unwrap();
        let rec = store.find_by_id(id).await.unwrap();
        assert_ne!(rec.password_hash, "plain-secret");
        assert!(!rec.password_hash.contains("plain-secret"));
    }

    #[tokio::test]
    async fn validation_order_is_username_password_role() {
        let svc = service();
        let err = svc.save_user(UserAddRequest::default()).await.unwrap_err();
        assert_eq!(err, ServiceError::BadRequest(ErrorReason::UserUsernameEmpty));

        let err = svc
            .save_user(UserAddRequest {
                username: Some("u".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::BadRequest(ErrorReason::UserPasswordEmpty));

        let err = svc.save_user(add_request("u", "p", None)).await.unwrap_err();
        assert_eq!(err, ServiceError::BadRequest(ErrorReason::UserRoleEmpty));
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let svc = service();
        svc.save_user(add_request("u", "p", Some(Role::Viewer)))
            .await
            .unwrap();
        let err = svc
            .save_user(add_request("u", "q", Some(Role::Editor)))
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::BadRequest(ErrorReason::UserUsernameExist));
    }

    #[tokio::test]
    async fn get_checks_id_then_existence() {
        let svc = service();
        assert_eq!(
            svc.get_user(0).await.unwrap_err(),
            ServiceError::BadRequest(ErrorReason::UserIdNegative)
        );
        assert_eq!(
            svc.get_user(5).await.unwrap_err(),
            ServiceError::NotFound(ErrorReason::GetUserNotFound)
        );
    }

    #[tokio::test]
    async fn admin_cannot_be_deleted() {
        let svc = service();
        svc.ensure_admin("admin").await.unwrap();
        let admin = svc.retrieve_users().await.remove(0);
        assert_eq!(admin.role, Role::Administrator);
        assert_eq!(
            svc.delete_user(admin.id).await.unwrap_err(),
            ServiceError::BadRequest(ErrorReason::UserDeleteAdmin)
        );
        assert_eq!(svc.authenticate(ADMIN_USERNAME, "admin").await, Some(Role::Administrator));
    }

    #[tokio::test]
    async fn delete_missing_or_regular_user_succeeds() {
        let svc = service();
        let id = svc
            .save_user(add_request("u", "p", Some(Role::Viewer)))
            .await
            .unwrap();
        svc.delete_user(id).await.unwrap();
        svc.delete_user(id).await.unwrap();
        assert!(svc.retrieve_users().await.is_empty());
        assert_eq!(
            svc.delete_user(-1).await.unwrap_err(),
            ServiceError::BadRequest(ErrorReason::UserIdNegative)
        );
    }

    #[tokio::test]
    async fn ensure_admin_is_idempotent() {
        let svc = service();
        svc.ensure_admin("first").await.unwrap();
        svc.ensure_admin("second").await.unwrap();
        assert_eq!(svc.retrieve_users().await.len(), 1);
        assert_eq!(svc.authenticate(ADMIN_USERNAME, "first").await, Some(Role::Administrator));
    }

    #[tokio::test]
    async fn ensure_admin_rejects_empty_password() {
        assert_eq!(
            service().ensure_admin("").await.unwrap_err(),
            ServiceError::BadRequest(ErrorReason::UserPasswordEmpty)
        );
    }
}
