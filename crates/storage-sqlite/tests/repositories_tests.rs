//! Integration tests against a real SQLite file: ledger sufficiency under
//! concurrent debits, position atomicity, unlock points and weather upserts.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal_macros::dec;
use tempfile::TempDir;

use energycoop_core::access::Role;
use energycoop_core::balances::{ledger, BalanceFilter, BalanceRepositoryTrait};
use energycoop_core::catalog::{NewProduct, NewProvider, ProductRepositoryTrait, ProductType, ProviderRepositoryTrait};
use energycoop_core::errors::{DatabaseError, Error};
use energycoop_core::gamification::{AchievementRepositoryTrait, NewAchievement};
use energycoop_core::geography::{
    MunicipalityRepositoryTrait, NewMunicipality, NewProvince, NewRegion,
    ProvinceRepositoryTrait, RegionRepositoryTrait, WeatherReading,
};
use energycoop_core::organizations::{NewOrganization, OrganizationRepositoryTrait};
use energycoop_core::pagination::PageRequest;
use energycoop_core::user_assets::{NewUserAsset, UserAssetFilter, UserAssetRepositoryTrait};
use energycoop_core::users::{
    CustomerProfileRepositoryTrait, CustomerType, NewCustomerProfile, NewUserRecord,
    UserRepositoryTrait,
};
use energycoop_storage_sqlite::balances::BalanceRepository;
use energycoop_storage_sqlite::catalog::{ProductRepository, ProviderRepository};
use energycoop_storage_sqlite::gamification::AchievementRepository;
use energycoop_storage_sqlite::geography::{
    MunicipalityRepository, ProvinceRepository, RegionRepository,
};
use energycoop_storage_sqlite::organizations::OrganizationRepository;
use energycoop_storage_sqlite::user_assets::UserAssetRepository;
use energycoop_storage_sqlite::users::{CustomerProfileRepository, UserRepository};
use energycoop_storage_sqlite::{open, Database};

fn setup() -> (TempDir, Database) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("energycoop.db");
    let db = open(path.to_str().unwrap()).unwrap();
    (dir, db)
}

async fn create_user(db: &Database, email: &str) -> String {
    let repo = UserRepository::new(db.pool.clone(), db.writer.clone());
    repo.create(NewUserRecord {
        name: "Test User".to_string(),
        email: email.to_string(),
        password_hash: "hash".to_string(),
        role: Role::Customer,
        organization_id: None,
    })
    .await
    .unwrap()
    .id
}

async fn create_product(db: &Database) -> String {
    let providers = ProviderRepository::new(db.pool.clone(), db.writer.clone());
    let provider = providers
        .create(
            NewProvider {
                name: "Sol Cooperativa".to_string(),
                description: None,
                website: None,
                renewable_percentage: dec!(100),
                co2_reduction: dec!(20),
                energy_efficiency: Some("A".to_string()),
                certifications: vec!["ISO 14001".to_string()],
                is_active: true,
            },
            dec!(75),
        )
        .await
        .unwrap();

    let products = ProductRepository::new(db.pool.clone(), db.writer.clone());
    products
        .create(
            NewProduct {
                provider_id: provider.id,
                name: "Huerta Solar".to_string(),
                product_type: ProductType::Solar,
                description: None,
                unit_price: dec!(100),
                min_investment: dec!(100),
                annual_yield: dec!(5),
                renewable_percentage: dec!(100),
                co2_reduction: dec!(10),
                energy_efficiency: None,
                certifications: vec![],
                is_active: true,
            },
            dec!(60),
        )
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_concurrent_withdrawals_never_overdraw() {
    let (_dir, db) = setup();
    let user_id = create_user(&db, "ana@example.com").await;
    let repo = Arc::new(BalanceRepository::new(db.pool.clone(), db.writer.clone()));

    repo.append(ledger::deposit_entry(&user_id, dec!(100), None, None))
        .await
        .unwrap();

    let first = {
        let repo = repo.clone();
        let entry = ledger::withdrawal_entry(&user_id, dec!(60), None, None);
        tokio::spawn(async move { repo.append_debit(entry).await })
    };
    let second = {
        let repo = repo.clone();
        let entry = ledger::withdrawal_entry(&user_id, dec!(60), None, None);
        tokio::spawn(async move { repo.append_debit(entry).await })
    };

    let results = [first.await.unwrap(), second.await.unwrap()];
    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    let insufficient = results
        .iter()
        .filter(|r| matches!(r, Err(Error::InsufficientFunds { .. })))
        .count();
    assert_eq!(succeeded, 1);
    assert_eq!(insufficient, 1);

    let entries = repo.list_for_user(&user_id).unwrap();
    let summary = ledger::summarize(&user_id, &entries).unwrap();
    assert_eq!(summary.current_balance, dec!(100));
    assert_eq!(summary.available_balance, dec!(40));
}

#[tokio::test]
async fn test_balance_list_filters_by_user_and_completes_pending_entry() {
    let (_dir, db) = setup();
    let ana = create_user(&db, "ana@example.com").await;
    let bea = create_user(&db, "bea@example.com").await;
    let repo = BalanceRepository::new(db.pool.clone(), db.writer.clone());

    repo.append(ledger::deposit_entry(&ana, dec!(50), Some("Nomina".to_string()), None))
        .await
        .unwrap();
    repo.append(ledger::deposit_entry(&bea, dec!(70), None, None))
        .await
        .unwrap();
    let pending = repo
        .append_debit(ledger::withdrawal_entry(&ana, dec!(20), None, None))
        .await
        .unwrap();

    let filter = BalanceFilter {
        user_id: Some(ana.clone()),
        ..Default::default()
    };
    let page = repo.list(&filter, PageRequest::default()).unwrap();
    assert_eq!(page.total, 2);
    assert!(page.items.iter().all(|b| b.user_id == ana));

    let completed = repo.complete(&pending.id).await.unwrap();
    assert_eq!(completed.status.as_str(), "completed");
    assert!(repo.complete(&pending.id).await.is_err());
    assert_eq!(repo.get_by_id(&pending.id).unwrap().amount, dec!(-20));
}

#[tokio::test]
async fn test_open_position_rolls_back_on_insufficient_funds() {
    let (_dir, db) = setup();
    let user_id = create_user(&db, "ana@example.com").await;
    let product_id = create_product(&db).await;
    let balances = BalanceRepository::new(db.pool.clone(), db.writer.clone());
    let assets = UserAssetRepository::new(db.pool.clone(), db.writer.clone());

    balances
        .append(ledger::deposit_entry(&user_id, dec!(150), None, None))
        .await
        .unwrap();

    let new_asset = |amount| NewUserAsset {
        user_id: user_id.clone(),
        product_id: product_id.clone(),
        quantity: dec!(2),
        total_investment: amount,
        current_value: amount,
        daily_yield: dec!(0.0274),
        auto_reinvest: false,
    };

    let result = assets
        .open_position(
            new_asset(dec!(200)),
            ledger::investment_entry(&user_id, dec!(200), &product_id, None, None),
        )
        .await;
    assert!(matches!(result, Err(Error::InsufficientFunds { .. })));

    let filter = UserAssetFilter {
        user_id: Some(user_id.clone()),
        ..Default::default()
    };
    assert_eq!(assets.list(&filter, PageRequest::default()).unwrap().total, 0);
    assert_eq!(balances.list_for_user(&user_id).unwrap().len(), 1);

    let (asset, entry) = assets
        .open_position(
            new_asset(dec!(100)),
            ledger::investment_entry(&user_id, dec!(100), &product_id, None, None),
        )
        .await
        .unwrap();
    assert_eq!(entry.user_asset_id.as_deref(), Some(asset.id.as_str()));
    assert_eq!(entry.amount, dec!(-100));

    let (grown, _) = assets
        .add_investment(
            &asset.id,
            ledger::investment_entry(&user_id, dec!(50), &product_id, Some(&asset.id), None),
        )
        .await
        .unwrap();
    assert_eq!(grown.total_investment, dec!(150));
    assert_eq!(grown.current_value, dec!(150));

    let products = ProductRepository::new(db.pool.clone(), db.writer.clone());
    assert_eq!(products.count_user_assets(&product_id).unwrap(), 1);
}

#[tokio::test]
async fn test_ledger_references_block_product_and_position_deletes() {
    let (_dir, db) = setup();
    let user_id = create_user(&db, "ana@example.com").await;
    let product_id = create_product(&db).await;
    let balances = BalanceRepository::new(db.pool.clone(), db.writer.clone());
    let assets = UserAssetRepository::new(db.pool.clone(), db.writer.clone());
    let products = ProductRepository::new(db.pool.clone(), db.writer.clone());

    balances
        .append(ledger::deposit_entry(&user_id, dec!(100), None, None))
        .await
        .unwrap();
    let (asset, entry) = assets
        .open_position(
            NewUserAsset {
                user_id: user_id.clone(),
                product_id: product_id.clone(),
                quantity: dec!(1),
                total_investment: dec!(80),
                current_value: dec!(80),
                daily_yield: dec!(0.0274),
                auto_reinvest: false,
            },
            ledger::investment_entry(&user_id, dec!(80), &product_id, None, None),
        )
        .await
        .unwrap();

    assert!(matches!(
        assets.delete(&asset.id).await,
        Err(Error::Database(DatabaseError::ForeignKeyViolation(_)))
    ));
    assert!(matches!(
        products.delete(&product_id).await,
        Err(Error::Database(DatabaseError::ForeignKeyViolation(_)))
    ));

    let stored = balances.get_by_id(&entry.id).unwrap();
    assert_eq!(stored.user_asset_id.as_deref(), Some(asset.id.as_str()));
    assert_eq!(stored.product_id.as_deref(), Some(product_id.as_str()));
    assert_eq!(stored.amount, dec!(-80));
}

#[tokio::test]
async fn test_unlock_adds_points_to_active_profiles_once() {
    let (_dir, db) = setup();
    let user_id = create_user(&db, "ana@example.com").await;

    let organizations = OrganizationRepository::new(db.pool.clone(), db.writer.clone());
    let org = organizations
        .create(NewOrganization {
            name: "Cooperativa del Sur".to_string(),
            slug: None,
            description: None,
            is_active: true,
        })
        .await
        .unwrap();
    assert_eq!(org.slug, "cooperativa-del-sur");

    let profiles = CustomerProfileRepository::new(db.pool.clone(), db.writer.clone());
    let profile = profiles
        .create(NewCustomerProfile {
            user_id: user_id.clone(),
            organization_id: org.id.clone(),
            customer_type: CustomerType::Individual,
            supply_point: None,
            municipality_id: None,
            is_active: true,
        })
        .await
        .unwrap();

    let achievements = AchievementRepository::new(db.pool.clone(), db.writer.clone());
    let achievement = achievements
        .create(NewAchievement {
            name: "First Investment".to_string(),
            description: None,
            category: "investment".to_string(),
            icon: None,
            points: 25,
            is_active: true,
        })
        .await
        .unwrap();

    achievements.unlock(&user_id, &achievement).await.unwrap();
    let again = achievements.unlock(&user_id, &achievement).await;
    assert!(matches!(again, Err(Error::ConstraintViolation(_))));

    assert_eq!(profiles.get_by_id(&profile.id).unwrap().points_total, 25);
    assert_eq!(achievements.list_unlocked_by_user(&user_id).unwrap().len(), 1);

    let counts = achievements.unlock_counts().unwrap();
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].1, 1);
}

#[tokio::test]
async fn test_weather_upsert_keeps_one_row_per_municipality() {
    let (_dir, db) = setup();
    let regions = RegionRepository::new(db.pool.clone(), db.writer.clone());
    let provinces = ProvinceRepository::new(db.pool.clone(), db.writer.clone());
    let municipalities = MunicipalityRepository::new(db.pool.clone(), db.writer.clone());

    let region = regions
        .create(NewRegion {
            name: "Andalucia".to_string(),
            code: "AN".to_string(),
        })
        .await
        .unwrap();
    let province = provinces
        .create(NewProvince {
            region_id: region.id.clone(),
            name: "Sevilla".to_string(),
            code: "SE".to_string(),
        })
        .await
        .unwrap();
    let municipality = municipalities
        .create(NewMunicipality {
            province_id: province.id.clone(),
            name: "Dos Hermanas".to_string(),
            postal_code: Some("41700".to_string()),
            latitude: Some(dec!(37.2830)),
            longitude: Some(dec!(-5.9209)),
        })
        .await
        .unwrap();

    assert!(municipalities.get_weather(&municipality.id).unwrap().is_none());

    let reading = |temperature| WeatherReading {
        temperature_c: temperature,
        humidity: dec!(40),
        cloud_cover: dec!(10),
        wind_speed_kmh: dec!(12),
        solar_irradiance: dec!(850),
        observed_at: Some(Utc::now().naive_utc()),
    };
    municipalities
        .upsert_weather(&municipality.id, reading(dec!(28.5)))
        .await
        .unwrap();
    municipalities
        .upsert_weather(&municipality.id, reading(dec!(31)))
        .await
        .unwrap();

    let weather = municipalities.get_weather(&municipality.id).unwrap().unwrap();
    assert_eq!(weather.temperature_c, dec!(31));
    assert_eq!(
        municipalities.get_by_id(&municipality.id).unwrap().latitude,
        Some(dec!(37.2830))
    );
    assert_eq!(regions.count_provinces(&region.id).unwrap(), 1);
    assert_eq!(provinces.count_municipalities(&province.id).unwrap(), 1);

    assert_eq!(municipalities.delete(&municipality.id).await.unwrap(), 1);
    assert!(municipalities.get_weather(&municipality.id).unwrap().is_none());
}
