use std::sync::Arc;

use crate::auth::gotrue::AuthGateway;
use crate::config::DEFAULT_MAX_PORTFOLIO_BYTES;
use crate::db::{PgStore, PortfolioStore, ProviderStore, ReviewStore};
use crate::storage::MediaStore;

/// Collaborators shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub providers: Arc<dyn ProviderStore>,
    pub reviews: Arc<dyn ReviewStore>,
    pub portfolio: Arc<dyn PortfolioStore>,
    pub media: Arc<dyn MediaStore>,
    pub auth: Arc<dyn AuthGateway>,
    pub max_portfolio_bytes: usize,
}

impl AppState {
    /// Wire all three tables to the same Postgres store.
    pub fn with_pg(
        store: PgStore,
        media: Arc<dyn MediaStore>,
        auth: Arc<dyn AuthGateway>,
        max_portfolio_bytes: usize,
    ) -> Self {
        let store = Arc::new(store);
        Self {
            providers: store.clone(),
            reviews: store.clone(),
            portfolio: store,
            media,
            auth,
            max_portfolio_bytes,
        }
    }

    pub fn new(
        providers: Arc<dyn ProviderStore>,
        reviews: Arc<dyn ReviewStore>,
        portfolio: Arc<dyn PortfolioStore>,
        media: Arc<dyn MediaStore>,
        auth: Arc<dyn AuthGateway>,
    ) -> Self {
        Self {
            providers,
            reviews,
            portfolio,
            media,
            auth,
            max_portfolio_bytes: DEFAULT_MAX_PORTFOLIO_BYTES,
        }
    }
}
