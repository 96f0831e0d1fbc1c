mod common;

use assert_matches::assert_matches;
use marketplace_schema::{
    constraints::ConstraintKind,
    entities::{account::DEFAULT_EMAIL, account::DEFAULT_MOBILE_NUMBER, Rolename},
    errors::{SchemaError, WriteContext},
    repositories::NewAccount,
};
use rstest::rstest;

use common::{password, TestDb};

fn assert_violates(err: SchemaError, name: &str, kind: ConstraintKind) {
    assert_matches!(
        err,
        SchemaError::ConstraintViolation { ref constraint, kind: k }
            if constraint == name && k == kind,
        "expected {name}"
    );
}

#[tokio::test]
async fn omitted_columns_take_their_defaults() {
    let t = TestDb::new().await;
    let account = t.account("alice_01").await;

    assert_eq!(account.login.as_deref(), Some("alice_01"));
    assert_eq!(account.mob_num.as_deref(), Some(DEFAULT_MOBILE_NUMBER));
    assert_eq!(account.email.as_deref(), Some(DEFAULT_EMAIL));
    assert_eq!(account.rolename, Some(Rolename::User));
}

#[tokio::test]
async fn explicit_contact_details_are_kept() {
    let t = TestDb::new().await;
    let account = t
        .repos
        .accounts
        .create(NewAccount {
            mob_num: Some("+380(67)123-45-67".into()),
            email: Some("broker_one@market.ua".into()),
            rolename: Some(Rolename::Broker),
            ..NewAccount::new("broker1", password())
        })
        .await
        .unwrap();

    assert_eq!(account.email.as_deref(), Some("broker_one@market.ua"));
    assert_eq!(account.rolename, Some(Rolename::Broker));
    assert_eq!(
        t.repos.accounts.find_by_login("broker1").await.unwrap(),
        Some(account)
    );
}

#[tokio::test]
async fn duplicate_login_is_rejected() {
    let t = TestDb::new().await;
    t.account("duplicate").await;

    let err = t
        .repos
        .accounts
        .create(NewAccount::new("duplicate", password()))
        .await
        .unwrap_err();
    assert_violates(err, "uq_account_login", ConstraintKind::Unique);
    assert_eq!(t.count("account").await, 1);
}

#[rstest]
#[case::too_short("abcde")]
#[case::too_long("abcdefghijklmnopq")]
#[case::leading_digit("1abcdef")]
#[case::trailing_underscore("abcdef_")]
#[case::punctuation("abc-def")]
#[tokio::test]
async fn malformed_logins_violate_ch_login(#[case] login: &str) {
    let t = TestDb::new().await;
    let err = t
        .repos
        .accounts
        .create(NewAccount::new(login, password()))
        .await
        .unwrap_err();
    assert_violates(err, "ch_login", ConstraintKind::Pattern);
}

#[rstest]
#[case::shortest("abcdef")]
#[case::longest("a_23456789012345")]
#[case::inner_underscores("a__b__c")]
#[tokio::test]
async fn well_formed_logins_are_accepted(#[case] login: &str) {
    let t = TestDb::new().await;
    t.account(login).await;
}

#[tokio::test]
async fn password_length_is_bounded() {
    let t = TestDb::new().await;

    let short = t
        .repos
        .accounts
        .create(NewAccount::new("shortpw", "x".repeat(99)))
        .await
        .unwrap_err();
    assert_violates(short, "ch_password", ConstraintKind::Pattern);

    t.repos
        .accounts
        .create(NewAccount::new("edgepw", "x".repeat(100)))
        .await
        .unwrap();
}

#[rstest]
#[case::missing_plus("380(67)123-45-67", "ch_mobnum")]
#[case::short_group("+380(6)123-45-67", "ch_mobnum")]
#[tokio::test]
async fn malformed_mobile_numbers_are_rejected(#[case] mob_num: &str, #[case] name: &str) {
    let t = TestDb::new().await;
    let err = t
        .repos
        .accounts
        .create(NewAccount {
            mob_num: Some(mob_num.into()),
            ..NewAccount::new("mobile", password())
        })
        .await
        .unwrap_err();
    assert_violates(err, name, ConstraintKind::Pattern);
}

#[rstest]
#[case::short_local("abc@domain.com")]
#[case::digit_first("1bcdefg@domain.com")]
#[case::long_tld("myemail@domain.info")]
#[case::two_dots("myemail@mail.domain.com")]
#[tokio::test]
async fn malformed_emails_violate_ch_email(#[case] email: &str) {
    let t = TestDb::new().await;
    let err = t
        .repos
        .accounts
        .create(NewAccount {
            email: Some(email.into()),
            ..NewAccount::new("emailer", password())
        })
        .await
        .unwrap_err();
    assert_violates(err, "ch_email", ConstraintKind::Pattern);
}

#[tokio::test]
async fn unknown_role_names_are_rejected_by_the_engine() {
    let t = TestDb::new().await;
    let err = t
        .exec(&format!(
            "INSERT INTO account (login, password, rolename) VALUES ('rogue_1', '{}', 'ADMIN')",
            password()
        ))
        .await
        .unwrap_err();

    let err = SchemaError::classify(err, WriteContext::insert("account"));
    assert_violates(err, "ch_rolename", ConstraintKind::Enumeration);
}

#[tokio::test]
async fn role_updates_and_deletes() {
    let t = TestDb::new().await;
    let account = t.account("consult1").await;

    let updated = t
        .repos
        .accounts
        .update_role(account.id, Rolename::Consultant)
        .await
        .unwrap();
    assert_eq!(updated.rolename, Some(Rolename::Consultant));

    t.repos.accounts.delete(account.id).await.unwrap();
    assert_eq!(t.repos.accounts.find_by_id(account.id).await.unwrap(), None);
    assert_matches!(
        t.repos.accounts.delete(account.id).await,
        Err(SchemaError::NotFound(_))
    );
    assert_matches!(
        t.repos.accounts.update_role(account.id, Rolename::User).await,
        Err(SchemaError::NotFound(_))
    );
}
