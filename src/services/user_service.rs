use crate::domain::auth::AuthSession;
use crate::domain::page::Page;
use crate::domain::user::{self, User, UserUpdate};
use crate::error::{AppError, Result};
use crate::services::auth_service::AuthService;
use crate::services::file_service::FileService;
use crate::storage::DbPool;
use crate::storage::user_repo::UserRepository;
use opentelemetry::{global, metrics::Counter};

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Clone, Debug)]
struct Metrics {
    users_registered_total: Counter<u64>,
    login_total: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("hoaxify-server");
        Self {
            users_registered_total: meter
                .u64_counter("users_registered_total")
                .with_description("Total number of successful user registrations")
                .build(),
            login_total: meter
                .u64_counter("auth_login_total")
                .with_description("Total number of successful login attempts")
                .build(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct UserService {
    pool: DbPool,
    user_repo: UserRepository,
    auth_service: AuthService,
    file_service: FileService,
    metrics: Metrics,
}

impl UserService {
    #[must_use]
    pub fn new(
        pool: DbPool,
        user_repo: UserRepository,
        auth_service: AuthService,
        file_service: FileService,
    ) -> Self {
        Self { pool, user_repo, auth_service, file_service, metrics: Metrics::new() }
    }

    #[tracing::instrument(
        skip(self, username, display_name, password),
        fields(user_id = tracing::field::Empty),
        err(level = "warn")
    )]
    pub async fn register(
        &self,
        username: Option<String>,
        display_name: Option<String>,
        password: Option<String>,
    ) -> Result<User> {
        let mut errors =
            user::validate_registration(username.as_deref(), display_name.as_deref(), password.as_deref());

        // The uniqueness pre-check yields the same field-level message the
        // client renders for any other constraint violation.
        if !errors.contains_key("username")
            && let Some(name) = username.as_deref()
        {
            let mut conn = self.pool.acquire().await?;
            if self.user_repo.exists_by_username(&mut conn, name).await? {
                errors.insert("username".to_string(), "This name is in use".to_string());
            }
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let (Some(username), Some(display_name), Some(password)) = (username, display_name, password)
        else {
            return Err(AppError::Internal);
        };

        let password_hash = self.auth_service.hash_password(&password).await?;

        let mut tx = self.pool.begin().await?;
        let user = match self.user_repo.create(&mut tx, &username, &display_name, &password_hash).await {
            Ok(user) => user,
            // Lost the race against a concurrent registration of the same name.
            Err(AppError::Database(e)) if is_unique_violation(&e) => {
                let mut errors = std::collections::BTreeMap::new();
                errors.insert("username".to_string(), "This name is in use".to_string());
                return Err(AppError::Validation(errors));
            }
            Err(e) => return Err(e),
        };
        tx.commit().await?;

        tracing::Span::current().record("user_id", tracing::field::display(user.id));
        tracing::info!("User registered successfully");
        self.metrics.users_registered_total.add(1, &[]);

        Ok(user)
    }

    #[tracing::instrument(
        skip(self, username, password),
        fields(user_id = tracing::field::Empty),
        err(level = "warn")
    )]
    pub async fn login(&self, username: String, password: String) -> Result<(User, AuthSession)> {
        let mut conn = self.pool.acquire().await?;
        let Some(user) = self.user_repo.find_by_username(&mut conn, &username).await? else {
            tracing::warn!("Login failed: user not found");
            return Err(AppError::AuthError);
        };

        tracing::Span::current().record("user_id", tracing::field::display(user.id));

        let is_valid = self.auth_service.verify_password(&password, &user.password_hash).await?;
        if !is_valid {
            tracing::warn!("Login failed: invalid password");
            return Err(AppError::AuthError);
        }

        let session = self.auth_service.create_session(user.id)?;

        tracing::info!("User logged in successfully");
        self.metrics.login_total.add(1, &[]);

        Ok((user, session))
    }

    /// Returns one page of users. An authenticated requester is excluded
    /// from their own listing.
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn get_users(
        &self,
        logged_in_user: Option<i64>,
        page: Option<i64>,
        size: Option<i64>,
    ) -> Result<Page<User>> {
        let number = page.unwrap_or(0).max(0);
        let size = size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let offset = number.saturating_mul(size);

        let mut conn = self.pool.acquire().await?;
        let total = self.user_repo.count(&mut conn, logged_in_user).await?;
        let users = self.user_repo.list(&mut conn, logged_in_user, size, offset).await?;

        Ok(Page::new(users, number, size, total))
    }

    #[tracing::instrument(skip(self), err(level = "debug"))]
    pub async fn get_by_username(&self, username: &str) -> Result<User> {
        let mut conn = self.pool.acquire().await?;
        self.user_repo.find_by_username(&mut conn, username).await?.ok_or(AppError::NotFound)
    }

    /// Applies a profile update: the display name is always overwritten,
    /// the image only when a new one was submitted. A replaced image file
    /// is removed once the row points at the new one.
    #[tracing::instrument(skip(self, update), fields(user_id = %id), err(level = "warn"))]
    pub async fn update(&self, id: i64, update: UserUpdate) -> Result<User> {
        let errors = user::validate_display_name(update.display_name.as_deref());
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let Some(display_name) = update.display_name else {
            return Err(AppError::Internal);
        };

        let saved_image = match update.image.as_deref() {
            Some(data) => Some(self.file_service.save_profile_image(data).await?),
            None => None,
        };

        let mut tx = self.pool.begin().await?;
        let Some(previous) = self.user_repo.find_by_id(&mut tx, id).await? else {
            return Err(AppError::NotFound);
        };
        let Some(updated) =
            self.user_repo.update_profile(&mut tx, id, &display_name, saved_image.as_deref()).await?
        else {
            return Err(AppError::NotFound);
        };
        tx.commit().await?;

        if saved_image.is_some()
            && let Some(old) = previous.image.as_deref()
        {
            self.file_service.delete_profile_image(old).await;
        }

        tracing::info!("User profile updated");
        Ok(updated)
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error.as_database_error().is_some_and(|db| db.code().as_deref() == Some("23505"))
}
