mod common;

use assert_matches::assert_matches;
use chrono::{Duration, SubsecRound, Utc};
use marketplace_schema::{
    db,
    entities::{BasketType, CompanyId, PriceHistoryId, ServiceKey},
    errors::SchemaError,
    repositories::NewService,
};
use rust_decimal_macros::dec;

use common::{at, TestDb};

const TABLES: [&str; 6] = [
    "account",
    "ban_list",
    "basket",
    "company",
    "price_history",
    "service",
];

#[tokio::test]
async fn lifting_a_ban_ends_it() {
    let t = TestDb::new().await;
    let account = t.account("offender").await;

    let until = Utc::now().naive_utc() + Duration::days(30);
    let ban = t.repos.bans.ban(account.id, until).await.unwrap();
    assert!(t.repos.bans.is_banned_now(account.id).await.unwrap());
    assert!(!t.repos.bans.is_banned(account.id, until).await.unwrap());

    // Lift at a moment already past, strictly after the ban started.
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    let lifted_at = Utc::now().naive_utc().trunc_subsecs(3);
    assert!(lifted_at > ban.started);
    let lifted = t.repos.bans.lift(account.id, lifted_at).await.unwrap();
    assert_eq!(lifted.ended, lifted_at);
    assert_eq!(lifted.started, ban.started);

    assert!(t.repos.bans.is_banned(account.id, ban.started).await.unwrap());
    assert!(!t.repos.bans.is_banned(account.id, lifted_at).await.unwrap());
    assert!(!t.repos.bans.is_banned_now(account.id).await.unwrap());
}

#[tokio::test]
async fn lifting_without_a_ban_is_not_found() {
    let t = TestDb::new().await;
    let account = t.account("innocent").await;

    assert_matches!(
        t.repos.bans.lift(account.id, at(1, 0)).await,
        Err(SchemaError::NotFound(_))
    );
    assert!(!t.repos.bans.is_banned(account.id, at(1, 0)).await.unwrap());
}

#[tokio::test]
async fn omitted_timestamps_default_to_now() {
    let t = TestDb::new().await;
    let account = t.account("stamped").await;
    let before = Utc::now().naive_utc() - Duration::minutes(1);

    let ban = t.repos.bans.ban(account.id, at(1, 0)).await.unwrap();
    let entry = t
        .repos
        .baskets
        .add(account.id, "legal review", BasketType::Consultation)
        .await
        .unwrap();

    let after = Utc::now().naive_utc() + Duration::minutes(1);
    assert!(ban.started > before && ban.started < after);
    assert!(entry.time > before && entry.time < after);
}

#[tokio::test]
async fn registering_a_company_writes_everything_or_nothing() {
    let t = TestDb::new().await;

    let err = t
        .repos
        .companies
        .register(
            CompanyId(3),
            "Northwind",
            vec![
                NewService::new("Bookkeeping", dec!(80.00)),
                NewService::new("Tax", dec!(40.00)),
            ],
        )
        .await
        .unwrap_err();
    assert_eq!(err.constraint(), Some("ch_sname"));
    assert_eq!(t.count("company").await, 0);
    assert_eq!(t.count("service").await, 0);

    let (company, services) = t
        .repos
        .companies
        .register(
            CompanyId(3),
            "Northwind",
            vec![
                NewService::new("Bookkeeping", dec!(80.00)),
                NewService::new("Tax planning", dec!(40.00)),
            ],
        )
        .await
        .unwrap();
    assert_eq!(company.company_id(), CompanyId(3));
    assert_eq!(services.len(), 2);

    let listed = t.repos.services.list_for_company("Northwind").await.unwrap();
    let names: Vec<_> = listed.iter().map(|s| s.service_name.as_str()).collect();
    assert_eq!(names, ["Bookkeeping", "Tax planning"]);
    assert_eq!(
        t.repos.companies.find_by_name("Northwind").await.unwrap(),
        Some(company)
    );
}

#[tokio::test]
async fn recorded_prices_form_an_ordered_ledger() {
    let t = TestDb::new().await;
    t.repos
        .companies
        .create(CompanyId(1), "Ledger Co")
        .await
        .unwrap();
    let key = ServiceKey::new("Audit support", "Ledger Co");
    t.repos.services.create(key.clone(), dec!(200.00)).await.unwrap();

    assert_eq!(
        t.repos.services.latest_price(&key).await.unwrap().round_dp(2),
        dec!(200.00)
    );

    t.repos
        .services
        .record_price(PriceHistoryId(10), &key, dec!(210.50))
        .await
        .unwrap();
    t.repos
        .services
        .record_price(PriceHistoryId(11), &key, dec!(225.25))
        .await
        .unwrap();

    let prices: Vec<_> = t
        .repos
        .services
        .price_history(&key)
        .await
        .unwrap()
        .into_iter()
        .map(|entry| entry.price.round_dp(2))
        .collect();
    assert_eq!(prices, [dec!(210.50), dec!(225.25)]);
    assert_eq!(
        t.repos.services.latest_price(&key).await.unwrap().round_dp(2),
        dec!(225.25)
    );

    // The ledger is append-only; the service row keeps its original price.
    let service = t.repos.services.find(&key).await.unwrap().unwrap();
    assert_eq!(service.price.round_dp(2), dec!(200.00));

    t.repos
        .companies
        .create(CompanyId(2), "Other Ledger")
        .await
        .unwrap();
    let other = ServiceKey::new("Other audit", "Other Ledger");
    t.repos.services.create(other.clone(), dec!(50.00)).await.unwrap();
    let dup = t
        .repos
        .services
        .record_price(PriceHistoryId(11), &other, dec!(1.00))
        .await
        .unwrap_err();
    assert_eq!(dup.constraint(), Some("pk_price_history"));

    t.repos.services.delete(&key).await.unwrap();
    assert_eq!(t.count("price_history").await, 0);
    assert_matches!(
        t.repos.services.latest_price(&key).await,
        Err(SchemaError::NotFound(_))
    );
}

#[tokio::test]
async fn ledger_keys_must_increase_per_service() {
    let t = TestDb::new().await;
    t.repos
        .companies
        .create(CompanyId(1), "Ledger Co")
        .await
        .unwrap();
    let key = ServiceKey::new("Audit support", "Ledger Co");
    t.repos.services.create(key.clone(), dec!(200.00)).await.unwrap();

    t.repos
        .services
        .record_price(PriceHistoryId(10), &key, dec!(210.00))
        .await
        .unwrap();

    for stale in [5, 10] {
        let err = t
            .repos
            .services
            .record_price(PriceHistoryId(stale), &key, dec!(300.00))
            .await
            .unwrap_err();
        assert_matches!(
            err,
            SchemaError::LedgerOutOfOrder { id, latest: 10 } if id == stale
        );
        assert!(err.is_integrity_violation());
    }

    assert_eq!(t.count("price_history").await, 1);
    assert_eq!(
        t.repos.services.latest_price(&key).await.unwrap().round_dp(2),
        dec!(210.00)
    );

    t.repos
        .services
        .record_price(PriceHistoryId(12), &key, dec!(300.00))
        .await
        .unwrap();
    assert_eq!(
        t.repos.services.latest_price(&key).await.unwrap().round_dp(2),
        dec!(300.00)
    );
}

#[tokio::test]
async fn migrations_down_removes_every_relation() {
    let t = TestDb::new().await;
    assert_eq!(t.tables().await, TABLES);

    db::rollback_migrations(&t.db, None).await.unwrap();
    assert!(t.tables().await.is_empty());

    db::run_migrations(&t.db).await.unwrap();
    assert_eq!(t.tables().await, TABLES);
}

#[tokio::test]
async fn reset_schema_discards_rows() {
    let t = TestDb::new().await;
    t.account("ephemeral").await;

    db::reset_schema(&t.db).await.unwrap();
    assert_eq!(t.count("account").await, 0);
    assert!(db::pending_migrations(&t.db).await.unwrap().is_empty());
}
