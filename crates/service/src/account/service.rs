use std::sync::Arc;

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use configs::AuthConfig;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::domain::{
    AuthSession, ChangePasswordInput, LoginInput, NewUser, RefreshedToken, RegisterInput, UpdateProfileInput, User,
    UserProfile,
};
use super::errors::AccountError;
use super::repository::UserRepository;
use super::validation::{validate_name, validate_password, validate_registration};
use crate::auth::token::TokenConfig;
use crate::auth::{Claims, CredentialService, TokenService};

/// Account use cases, independent of the web framework.
pub struct AccountService<R: UserRepository + ?Sized> {
    repo: Arc<R>,
    credentials: CredentialService,
    tokens: TokenService,
}

impl<R: UserRepository + ?Sized> AccountService<R> {
    pub fn new(repo: Arc<R>, credentials: CredentialService, tokens: TokenService) -> Self {
        Self { repo, credentials, tokens }
    }

    pub fn from_config(repo: Arc<R>, cfg: &AuthConfig) -> Result<Self, AccountError> {
        let credentials = CredentialService::new(&cfg.hashing)?;
        let tokens = TokenService::new(&TokenConfig::from(cfg))?;
        Ok(Self::new(repo, credentials, tokens))
    }

    /// Register a new user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use std::time::Duration;
    /// use service::account::{AccountService, domain::RegisterInput, repository::mock::InMemoryUserRepository};
    /// use service::auth::{token::TokenConfig, CredentialService, TokenService};
    ///
    /// let repo = Arc::new(InMemoryUserRepository::default());
    /// let creds = CredentialService::new(&configs::HashingConfig { memory_kib: 256, iterations: 1, parallelism: 1 }).unwrap();
    /// let tokens = TokenService::new(&TokenConfig { secret: "secret".into(), ttl: Duration::from_secs(60), refresh_grace: Duration::ZERO }).unwrap();
    /// let svc = AccountService::new(repo, creds, tokens);
    /// let input = RegisterInput { email: "user@example.com".into(), password: "Secret123".into(), name: "Test".into() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<UserProfile, AccountError> {
        let email = input.email.trim().to_string();
        let name = input.name.trim().to_string();
        validate_registration(&email, &input.password, &name)?;

        // Best effort only; the unique index decides races
        if let Some(existing) = self.repo.find_by_email(&email).await? {
            debug!(user_id = %existing.id, "email already registered");
            return Err(AccountError::EmailExists);
        }

        let password_hash = self.hash_password(&input.password).await?;
        let user = self.repo.create(NewUser { email, password_hash, name }).await?;
        info!(user_id = %user.id, email = %user.email, "user_registered");
        Ok(UserProfile::from(&user))
    }

    /// Authenticate and issue a session token.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AccountError> {
        let user = self.authenticate(input.email.trim(), &input.password).await?;
        let issued = self.tokens.issue(user.id, &user.email)?;
        info!(user_id = %user.id, expires_at = %issued.expires_at, "user_logged_in");
        Ok(AuthSession { token: issued.token, expires_at: issued.expires_at, user: UserProfile::from(&user) })
    }

    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AccountError> {
        let Some(user) = self.repo.find_by_email(email).await? else {
            self.burn_verification(password).await;
            return Err(AccountError::InvalidCredentials);
        };
        if !self.verify_password(password, &user.password_hash).await? {
            return Err(AccountError::InvalidCredentials);
        }
        Ok(user)
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<UserProfile, AccountError> {
        let user = self.load(user_id).await?;
        Ok(UserProfile::from(&user))
    }

    /// Changes the display name only.
    #[instrument(skip(self, input), fields(user_id = %user_id))]
    pub async fn update_profile(&self, user_id: Uuid, input: UpdateProfileInput) -> Result<UserProfile, AccountError> {
        let name = input.name.trim();
        validate_name(name)?;
        let mut user = self.load(user_id).await?;
        user.name = name.to_string();
        user.updated_at = advance(user.updated_at);
        let saved = self.repo.update(&user).await?;
        info!(user_id = %saved.id, "profile_updated");
        Ok(UserProfile::from(&saved))
    }

    #[instrument(skip(self, input), fields(user_id = %user_id))]
    pub async fn change_password(&self, user_id: Uuid, input: ChangePasswordInput) -> Result<(), AccountError> {
        let mut user = self.load(user_id).await?;
        if !self.verify_password(&input.current_password, &user.password_hash).await? {
            return Err(AccountError::InvalidCredentials);
        }
        validate_password(&input.new_password)?;
        user.password_hash = self.hash_password(&input.new_password).await?;
        user.updated_at = advance(user.updated_at);
        self.repo.update(&user).await?;
        info!(user_id = %user.id, "password_changed");
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn delete_account(&self, user_id: Uuid) -> Result<(), AccountError> {
        self.repo.delete(user_id).await?;
        info!(user_id = %user_id, "account_deleted");
        Ok(())
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, AccountError> {
        Ok(self.tokens.validate(token)?)
    }

    /// New token from a valid or recently expired one, as long as the
    /// account still exists.
    pub async fn refresh_token(&self, token: &str) -> Result<RefreshedToken, AccountError> {
        let (claims, issued) = self.tokens.refresh(token)?;
        let user_id = claims.user_id()?;
        if self.repo.find_by_id(user_id).await?.is_none() {
            debug!(user_id = %user_id, "refresh for missing account");
            return Err(AccountError::InvalidToken);
        }
        info!(user_id = %user_id, expires_at = %issued.expires_at, "token_refreshed");
        Ok(RefreshedToken { token: issued.token, expires_at: issued.expires_at })
    }

    async fn load(&self, user_id: Uuid) -> Result<User, AccountError> {
        self.repo.find_by_id(user_id).await?.ok_or(AccountError::NotFound)
    }

    async fn hash_password(&self, plaintext: &str) -> Result<String, AccountError> {
        let credentials = self.credentials.clone();
        let plaintext = plaintext.to_owned();
        let hashed = tokio::task::spawn_blocking(move || credentials.hash(&plaintext))
            .await
            .map_err(|e| AccountError::Hashing(e.to_string()))??;
        Ok(hashed)
    }

    async fn verify_password(&self, plaintext: &str, stored_hash: &str) -> Result<bool, AccountError> {
        let credentials = self.credentials.clone();
        let plaintext = plaintext.to_owned();
        let stored_hash = stored_hash.to_owned();
        let ok = tokio::task::spawn_blocking(move || credentials.verify(&plaintext, &stored_hash))
            .await
            .map_err(|e| AccountError::Hashing(e.to_string()))??;
        Ok(ok)
    }

    async fn burn_verification(&self, plaintext: &str) {
        let credentials = self.credentials.clone();
        let plaintext = plaintext.to_owned();
        let _ = tokio::task::spawn_blocking(move || credentials.verify_dummy(&plaintext)).await;
    }
}

/// A timestamp strictly later than `prev`, normally just now, at the
/// microsecond precision PostgreSQL stores.
fn advance(prev: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now().trunc_subsecs(6);
    if now > prev { now } else { prev.trunc_subsecs(6) + TimeDelta::microseconds(1) }
}
