use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use energycoop_core::{
    balances::{BalanceService, BalanceServiceTrait},
    catalog::{ProductService, ProductServiceTrait, ProviderService, ProviderServiceTrait},
    content::{
        articles::{ArticleService, ArticleServiceTrait},
        banners::{BannerService, BannerServiceTrait},
        collaborators::{CollaboratorService, CollaboratorServiceTrait},
        contacts::{ContactService, ContactServiceTrait},
        faqs::{FaqService, FaqServiceTrait},
        menus::{MenuItemService, MenuItemServiceTrait},
        social_links::{SocialLinkService, SocialLinkServiceTrait},
    },
    gamification::{
        AchievementService, AchievementServiceTrait, TeamChallengeService,
        TeamChallengeServiceTrait,
    },
    geography::{GeographyService, GeographyServiceTrait},
    organizations::{OrganizationService, OrganizationServiceTrait},
    user_assets::{UserAssetService, UserAssetServiceTrait},
    users::{CustomerProfileService, CustomerProfileServiceTrait, UserService, UserServiceTrait},
};
use energycoop_storage_sqlite::{
    balances::BalanceRepository,
    catalog::{ProductRepository, ProviderRepository},
    content::{
        ArticleRepository, BannerRepository, CollaboratorRepository, ContactRepository,
        FaqRepository, MenuItemRepository, SocialLinkRepository,
    },
    gamification::{AchievementRepository, TeamChallengeRepository},
    geography::{MunicipalityRepository, ProvinceRepository, RegionRepository},
    open,
    organizations::OrganizationRepository,
    user_assets::UserAssetRepository,
    users::{CustomerProfileRepository, UserRepository},
};

use crate::auth::{decode_secret_key, random_secret_key, Argon2PasswordHasher, AuthConfig, AuthManager};
use crate::config::Config;

pub struct AppState {
    pub organization_service: Arc<dyn OrganizationServiceTrait + Send + Sync>,
    pub user_service: Arc<dyn UserServiceTrait + Send + Sync>,
    pub customer_profile_service: Arc<dyn CustomerProfileServiceTrait + Send + Sync>,
    pub balance_service: Arc<dyn BalanceServiceTrait + Send + Sync>,
    pub provider_service: Arc<dyn ProviderServiceTrait + Send + Sync>,
    pub product_service: Arc<dyn ProductServiceTrait + Send + Sync>,
    pub user_asset_service: Arc<dyn UserAssetServiceTrait + Send + Sync>,
    pub achievement_service: Arc<dyn AchievementServiceTrait + Send + Sync>,
    pub team_challenge_service: Arc<dyn TeamChallengeServiceTrait + Send + Sync>,
    pub article_service: Arc<dyn ArticleServiceTrait + Send + Sync>,
    pub faq_service: Arc<dyn FaqServiceTrait + Send + Sync>,
    pub banner_service: Arc<dyn BannerServiceTrait + Send + Sync>,
    pub collaborator_service: Arc<dyn CollaboratorServiceTrait + Send + Sync>,
    pub menu_service: Arc<dyn MenuItemServiceTrait + Send + Sync>,
    pub contact_service: Arc<dyn ContactServiceTrait + Send + Sync>,
    pub social_link_service: Arc<dyn SocialLinkServiceTrait + Send + Sync>,
    pub geography_service: Arc<dyn GeographyServiceTrait + Send + Sync>,
    pub auth: Arc<AuthManager>,
}

pub fn init_tracing() {
    let log_format = std::env::var("EC_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // `try_init` also bridges `log` records from the core and storage crates.
    let result = if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .try_init()
    };
    if let Err(e) = result {
        eprintln!("Tracing already initialized: {e}");
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db = open(&config.db_path)?;
    tracing::info!("Database path in use: {}", config.db_path);
    let (pool, writer) = (db.pool.clone(), db.writer.clone());

    let organization_repository = Arc::new(OrganizationRepository::new(pool.clone(), writer.clone()));
    let user_repository = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let profile_repository = Arc::new(CustomerProfileRepository::new(pool.clone(), writer.clone()));
    let balance_repository = Arc::new(BalanceRepository::new(pool.clone(), writer.clone()));
    let provider_repository = Arc::new(ProviderRepository::new(pool.clone(), writer.clone()));
    let product_repository = Arc::new(ProductRepository::new(pool.clone(), writer.clone()));
    let user_asset_repository = Arc::new(UserAssetRepository::new(pool.clone(), writer.clone()));
    let achievement_repository = Arc::new(AchievementRepository::new(pool.clone(), writer.clone()));
    let challenge_repository = Arc::new(TeamChallengeRepository::new(pool.clone(), writer.clone()));

    let user_service = Arc::new(UserService::new(
        user_repository.clone(),
        Arc::new(Argon2PasswordHasher),
    ));

    if let Some(admin) = &config.admin {
        let user = user_service
            .ensure_super_admin(&admin.name, &admin.email, &admin.password)
            .await?;
        tracing::info!("Super-admin account ready: {}", user.email);
    }

    let geography_service = Arc::new(GeographyService::new(
        Arc::new(RegionRepository::new(pool.clone(), writer.clone())),
        Arc::new(ProvinceRepository::new(pool.clone(), writer.clone())),
        Arc::new(MunicipalityRepository::new(pool.clone(), writer.clone())),
    ));

    let jwt_secret = match &config.jwt_secret {
        Some(raw) => decode_secret_key(raw)?,
        None => {
            tracing::warn!("EC_JWT_SECRET is not set; tokens will not survive a restart");
            random_secret_key()
        }
    };
    let auth = Arc::new(AuthManager::new(&AuthConfig {
        jwt_secret,
        access_token_ttl: config.token_ttl,
    }));

    Ok(Arc::new(AppState {
        organization_service: Arc::new(OrganizationService::new(organization_repository)),
        customer_profile_service: Arc::new(CustomerProfileService::new(
            profile_repository,
            user_repository.clone(),
        )),
        balance_service: Arc::new(BalanceService::new(balance_repository)),
        provider_service: Arc::new(ProviderService::new(provider_repository.clone())),
        product_service: Arc::new(ProductService::new(
            product_repository.clone(),
            provider_repository,
        )),
        user_asset_service: Arc::new(UserAssetService::new(
            user_asset_repository,
            product_repository,
        )),
        achievement_service: Arc::new(AchievementService::new(
            achievement_repository,
            user_repository,
        )),
        team_challenge_service: Arc::new(TeamChallengeService::new(challenge_repository)),
        article_service: Arc::new(ArticleService::new(Arc::new(ArticleRepository::new(
            pool.clone(),
            writer.clone(),
        )))),
        faq_service: Arc::new(FaqService::new(Arc::new(FaqRepository::new(
            pool.clone(),
            writer.clone(),
        )))),
        banner_service: Arc::new(BannerService::new(Arc::new(BannerRepository::new(
            pool.clone(),
            writer.clone(),
        )))),
        collaborator_service: Arc::new(CollaboratorService::new(Arc::new(
            CollaboratorRepository::new(pool.clone(), writer.clone()),
        ))),
        menu_service: Arc::new(MenuItemService::new(Arc::new(MenuItemRepository::new(
            pool.clone(),
            writer.clone(),
        )))),
        contact_service: Arc::new(ContactService::new(Arc::new(ContactRepository::new(
            pool.clone(),
            writer.clone(),
        )))),
        social_link_service: Arc::new(SocialLinkService::new(Arc::new(
            SocialLinkRepository::new(pool, writer),
        ))),
        user_service,
        geography_service,
        auth,
    }))
}
