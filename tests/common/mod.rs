//! In-memory collaborators for the integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use sea_orm::DbErr;
use uuid::Uuid;

use pintarlokal_backend::auth::gotrue::{AuthGateway, AuthSession, SignUpAttributes};
use pintarlokal_backend::auth::jwt::{Claims, UserMetadata};
use pintarlokal_backend::auth::{Identity, Role};
use pintarlokal_backend::db::{PortfolioStore, ProviderStore, ReviewStore};
use pintarlokal_backend::errors::{AppError, AppResult};
use pintarlokal_backend::models::providers::{CreateProvider, ProfileFields};
use pintarlokal_backend::models::{portfolio, providers, reviews};
use pintarlokal_backend::state::AppState;
use pintarlokal_backend::storage::MediaStore;

pub const TEST_SECRET: &str = "test-secret-at-least-256-bits-long-for-hs256-xxxxxxx";

/// Shared, ordered record of every collaborator call.
pub type EventLog = Arc<Mutex<Vec<String>>>;

fn log(events: &EventLog, event: String) {
    events.lock().unwrap().push(event);
}

#[derive(Default)]
pub struct MemoryStore {
    pub events: EventLog,
    pub providers: Mutex<Vec<providers::Model>>,
    pub reviews: Mutex<Vec<reviews::Model>>,
    pub portfolio: Mutex<Vec<portfolio::Model>>,
    pub fail_review_insert: AtomicBool,
    pub fail_review_list: AtomicBool,
    pub fail_portfolio_insert: AtomicBool,
}

impl MemoryStore {
    pub fn with_events(events: EventLog) -> Self {
        Self {
            events,
            ..Default::default()
        }
    }

    pub fn add_provider(&self, owner_id: Uuid, name: &str, category: &str) -> providers::Model {
        let created_at = Utc::now() + Duration::milliseconds(self.providers.lock().unwrap().len() as i64);
        let provider = providers::Model {
            id: Uuid::new_v4(),
            user_id: owner_id,
            email: None,
            name: name.to_string(),
            category: category.to_string(),
            whatsapp_number: None,
            bio: None,
            avatar_url: None,
            city: None,
            features: Vec::new(),
            is_active: true,
            created_at,
            updated_at: None,
        };
        self.providers.lock().unwrap().push(provider.clone());
        provider
    }

    pub fn add_review(&self, provider_id: Uuid, rating: i32) -> reviews::Model {
        let mut rows = self.reviews.lock().unwrap();
        let review = reviews::Model {
            id: Uuid::new_v4(),
            provider_id,
            user_id: Uuid::new_v4(),
            reviewer_name: "Tamu".into(),
            reviewer_avatar: None,
            rating,
            comment: "Mantap".into(),
            created_at: Utc::now() + Duration::milliseconds(rows.len() as i64),
        };
        rows.push(review.clone());
        review
    }

    pub fn add_portfolio(&self, owner_id: Uuid, image_url: &str) -> portfolio::Model {
        let item = portfolio::Model {
            id: Uuid::new_v4(),
            user_id: owner_id,
            image_url: image_url.to_string(),
            created_at: Utc::now(),
        };
        self.portfolio.lock().unwrap().push(item.clone());
        item
    }

    pub fn review_count(&self) -> usize {
        self.reviews.lock().unwrap().len()
    }

    pub fn portfolio_count(&self) -> usize {
        self.portfolio.lock().unwrap().len()
    }

    fn owner_row(&self, owner_id: Uuid) -> Result<providers::Model, DbErr> {
        self.providers
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.user_id == owner_id)
            .cloned()
            .ok_or_else(|| DbErr::RecordNotFound(format!("provider {owner_id}")))
    }

    fn replace_provider(&self, row: providers::Model) {
        let mut rows = self.providers.lock().unwrap();
        match rows.iter_mut().find(|p| p.user_id == row.user_id) {
            Some(existing) => *existing = row,
            None => rows.push(row),
        }
    }
}

#[async_trait]
impl ProviderStore for MemoryStore {
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Option<providers::Model>, DbErr> {
        Ok(self.owner_row(owner_id).ok())
    }

    async fn create(&self, input: CreateProvider) -> Result<providers::Model, DbErr> {
        log(&self.events, format!("db:create_provider:{}", input.user_id));
        let mut row = self.add_provider(input.user_id, &input.name, &input.category);
        row.email = input.email;
        self.replace_provider(row.clone());
        Ok(row)
    }

    async fn upsert_profile(
        &self,
        owner_id: Uuid,
        fields: ProfileFields,
    ) -> Result<providers::Model, DbErr> {
        log(&self.events, format!("db:upsert_profile:{owner_id}"));
        let mut row = match self.owner_row(owner_id) {
            Ok(row) => row,
            Err(_) => self.add_provider(owner_id, &fields.name, &fields.category),
        };
        row.name = fields.name;
        row.category = fields.category;
        row.whatsapp_number = fields.whatsapp_number;
        row.bio = fields.bio;
        row.avatar_url = fields.avatar_url;
        row.features = fields.features;
        row.updated_at = Some(Utc::now());
        self.replace_provider(row.clone());
        Ok(row)
    }

    async fn set_features(
        &self,
        owner_id: Uuid,
        features: Vec<String>,
    ) -> Result<providers::Model, DbErr> {
        let mut row = self.owner_row(owner_id)?;
        row.features = features;
        self.replace_provider(row.clone());
        Ok(row)
    }

    async fn search(&self, term: Option<&str>) -> Result<Vec<providers::Model>, DbErr> {
        let term = term.map(str::to_lowercase);
        let mut rows: Vec<_> = self
            .providers
            .lock()
            .unwrap()
            .iter()
            .filter(|p| match &term {
                None => true,
                Some(t) => {
                    p.name.to_lowercase().contains(t)
                        || p.category.to_lowercase().contains(t)
                        || p.bio.as_deref().is_some_and(|b| b.to_lowercase().contains(t))
                }
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn newest(&self, limit: u64) -> Result<Vec<providers::Model>, DbErr> {
        let mut rows = self.search(None).await?;
        rows.truncate(limit as usize);
        Ok(rows)
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn insert(&self, input: reviews::CreateReview) -> Result<reviews::Model, DbErr> {
        log(&self.events, format!("db:insert_review:{}", input.provider_id));
        if self.fail_review_insert.load(Ordering::SeqCst) {
            return Err(DbErr::Custom("connection reset".into()));
        }
        let mut row = self.add_review(input.provider_id, input.rating);
        row.user_id = input.user_id;
        row.reviewer_name = input.reviewer_name;
        row.reviewer_avatar = input.reviewer_avatar;
        row.comment = input.comment;

        let mut rows = self.reviews.lock().unwrap();
        if let Some(last) = rows.last_mut() {
            *last = row.clone();
        }
        Ok(row)
    }

    async fn list_by_provider(&self, provider_id: Uuid) -> Result<Vec<reviews::Model>, DbErr> {
        if self.fail_review_list.load(Ordering::SeqCst) {
            return Err(DbErr::Custom("timeout on refetch".into()));
        }
        let mut rows: Vec<_> = self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.provider_id == provider_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn find(&self, id: Uuid) -> Result<Option<reviews::Model>, DbErr> {
        Ok(self.reviews.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let mut rows = self.reviews.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        Ok(rows.len() != before)
    }

    async fn ratings_for(&self, provider_ids: &[Uuid]) -> Result<Vec<(Uuid, i32)>, DbErr> {
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| provider_ids.contains(&r.provider_id))
            .map(|r| (r.provider_id, r.rating))
            .collect())
    }
}

#[async_trait]
impl PortfolioStore for MemoryStore {
    async fn insert(&self, owner_id: Uuid, image_url: String) -> Result<portfolio::Model, DbErr> {
        log(&self.events, format!("db:insert_portfolio:{image_url}"));
        if self.fail_portfolio_insert.load(Ordering::SeqCst) {
            return Err(DbErr::Custom("connection reset".into()));
        }
        Ok(self.add_portfolio(owner_id, &image_url))
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<portfolio::Model>, DbErr> {
        let mut rows: Vec<_> = self
            .portfolio
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.user_id == owner_id)
            .cloned()
            .collect();
        rows.reverse();
        Ok(rows)
    }

    async fn find(&self, id: Uuid) -> Result<Option<portfolio::Model>, DbErr> {
        Ok(self.portfolio.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        log(&self.events, format!("db:delete_portfolio:{id}"));
        let mut rows = self.portfolio.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| p.id != id);
        Ok(rows.len() != before)
    }
}

/// Object store that keeps nothing but the calls made to it.
#[derive(Default)]
pub struct RecordingMedia {
    pub events: EventLog,
    pub fail_upload: AtomicBool,
    pub fail_remove: AtomicBool,
}

impl RecordingMedia {
    pub fn with_events(events: EventLog) -> Self {
        Self {
            events,
            ..Default::default()
        }
    }
}

#[async_trait]
impl MediaStore for RecordingMedia {
    async fn upload(&self, bucket: &str, key: &str, _bytes: Vec<u8>, _content_type: &str) -> AppResult<()> {
        log(&self.events, format!("media:upload:{bucket}/{key}"));
        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(AppError::Storage("bucket unavailable".into()));
        }
        Ok(())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        log(&self.events, format!("media:public_url:{bucket}/{key}"));
        format!("https://demo.supabase.co/storage/v1/object/public/{bucket}/{key}")
    }

    async fn remove(&self, bucket: &str, keys: &[String]) -> AppResult<()> {
        log(&self.events, format!("media:remove:{bucket}/{}", keys.join(",")));
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(AppError::Storage("bucket unavailable".into()));
        }
        Ok(())
    }
}

/// Auth provider that accepts every sign-up and remembers the role chosen.
#[derive(Default)]
pub struct FakeAuth {
    pub users: Mutex<Vec<(String, Identity)>>,
    pub signed_out: Mutex<Vec<String>>,
}

#[async_trait]
impl AuthGateway for FakeAuth {
    async fn sign_up(
        &self,
        email: &str,
        _password: &str,
        attributes: SignUpAttributes,
    ) -> AppResult<Identity> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|(e, _)| e == email) {
            return Err(AppError::Auth("User already registered".into()));
        }
        let identity = Identity {
            id: Uuid::new_v4(),
            email: Some(email.to_string()),
            full_name: Some(attributes.full_name),
            avatar_url: None,
            role: attributes.role,
        };
        users.push((email.to_string(), identity.clone()));
        Ok(identity)
    }

    async fn sign_in_with_password(&self, email: &str, _password: &str) -> AppResult<AuthSession> {
        let users = self.users.lock().unwrap();
        let (_, user) = users
            .iter()
            .find(|(e, _)| e == email)
            .ok_or_else(|| AppError::Auth("Invalid login credentials".into()))?;
        Ok(AuthSession {
            access_token: format!("token-{}", user.id),
            refresh_token: None,
            expires_in: Some(3600),
            user: user.clone(),
        })
    }

    async fn sign_out(&self, access_token: &str) -> AppResult<()> {
        self.signed_out.lock().unwrap().push(access_token.to_string());
        Ok(())
    }
}

pub struct Harness {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub media: Arc<RecordingMedia>,
    pub auth: Arc<FakeAuth>,
    pub events: EventLog,
}

impl Harness {
    pub fn new() -> Self {
        let events: EventLog = Arc::default();
        let store = Arc::new(MemoryStore::with_events(events.clone()));
        let media = Arc::new(RecordingMedia::with_events(events.clone()));
        let auth = Arc::new(FakeAuth::default());
        let state = AppState::new(
            store.clone(),
            store.clone(),
            store.clone(),
            media.clone(),
            auth.clone(),
        );
        Self {
            state,
            store,
            media,
            auth,
            events,
        }
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

pub fn identity(id: Uuid, full_name: Option<&str>, email: &str) -> Identity {
    Identity {
        id,
        email: Some(email.to_string()),
        full_name: full_name.map(str::to_string),
        avatar_url: None,
        role: Role::Buyer,
    }
}

/// Mint a Supabase-shaped HS256 token for `user_id`.
pub fn mint_token(user_id: Uuid, email: &str, full_name: Option<&str>) -> String {
    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        exp: now + 3600,
        iat: Some(now),
        iss: Some("https://demo.supabase.co/auth/v1".to_string()),
        email: Some(email.to_string()),
        role: Some("authenticated".to_string()),
        user_metadata: Some(UserMetadata {
            full_name: full_name.map(str::to_string),
            ..Default::default()
        }),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("Failed to encode test JWT")
}
