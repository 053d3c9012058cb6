use super::*;

fn alice() -> Principal {
    Principal { id: "u1".into(), name: "A".into(), email: "a@b.com".into() }
}

// =============================================================================
// sessions
// =============================================================================

#[tokio::test]
async fn create_session_with_valid_credentials() {
    let identity = MemoryIdentity::new().with_account(alice(), "password1");
    let session = identity.create_session("a@b.com", "password1").await.unwrap();
    assert_eq!(session.user_id, "u1");
    assert_eq!(identity.current_session(), Some(session));
}

#[tokio::test]
async fn create_session_email_is_case_insensitive() {
    let identity = MemoryIdentity::new().with_account(alice(), "password1");
    assert!(identity.create_session("A@B.com", "password1").await.is_ok());
}

#[tokio::test]
async fn create_session_wrong_password() {
    let identity = MemoryIdentity::new().with_account(alice(), "password1");
    let err = identity.create_session("a@b.com", "nope").await.unwrap_err();
    assert_eq!(err, IdentityError::InvalidCredentials);
    assert!(identity.current_session().is_none());
}

#[tokio::test]
async fn create_session_unknown_email() {
    let identity = MemoryIdentity::new();
    let err = identity.create_session("x@y.com", "password1").await.unwrap_err();
    assert_eq!(err, IdentityError::InvalidCredentials);
}

#[tokio::test]
async fn get_account_without_session() {
    let identity = MemoryIdentity::new().with_account(alice(), "password1");
    assert_eq!(identity.get_account().await.unwrap_err(), IdentityError::NoSession);
}

#[tokio::test]
async fn get_account_with_active_session() {
    let identity = MemoryIdentity::new().with_active_session(alice(), "password1");
    assert_eq!(identity.get_account().await.unwrap(), alice());
}

#[tokio::test]
async fn delete_current_session() {
    let identity = MemoryIdentity::new().with_active_session(alice(), "password1");
    identity.delete_session(CURRENT_SESSION).await.unwrap();
    assert!(identity.current_session().is_none());
    assert_eq!(identity.delete_session(CURRENT_SESSION).await.unwrap_err(), IdentityError::NoSession);
}

#[tokio::test]
async fn delete_session_by_unknown_id() {
    let identity = MemoryIdentity::new().with_active_session(alice(), "password1");
    assert_eq!(identity.delete_session("other").await.unwrap_err(), IdentityError::NoSession);
    assert!(identity.current_session().is_some());
}

// =============================================================================
// accounts
// =============================================================================

#[tokio::test]
async fn create_account_with_custom_id() {
    let identity = MemoryIdentity::new();
    let p = identity
        .create_account(&UserId::Custom("u9".into()), "n@b.com", "password1", "N")
        .await
        .unwrap();
    assert_eq!(p, Principal { id: "u9".into(), name: "N".into(), email: "n@b.com".into() });
    // Creating an account does not sign in.
    assert!(identity.current_session().is_none());
}

#[tokio::test]
async fn create_account_unique_id_is_minted() {
    let identity = MemoryIdentity::new();
    let p = identity.create_account(&UserId::Unique, "n@b.com", "password1", "N").await.unwrap();
    assert_eq!(p.id.len(), 32);
}

#[tokio::test]
async fn create_account_duplicate_email() {
    let identity = MemoryIdentity::new().with_account(alice(), "password1");
    let err = identity
        .create_account(&UserId::Unique, "a@b.com", "password2", "A2")
        .await
        .unwrap_err();
    assert_eq!(err, IdentityError::AccountExists);
}

#[tokio::test]
async fn create_account_duplicate_custom_id() {
    let identity = MemoryIdentity::new().with_account(alice(), "password1");
    let err = identity
        .create_account(&UserId::Custom("u1".into()), "other@x.com", "password2", "O")
        .await
        .unwrap_err();
    assert_eq!(err, IdentityError::AccountExists);

    // The taken id must not shadow the original account.
    assert_eq!(
        identity.create_session("other@x.com", "password2").await.unwrap_err(),
        IdentityError::InvalidCredentials
    );
    identity.create_session("a@b.com", "password1").await.unwrap();
    assert_eq!(identity.get_account().await.unwrap(), alice());
}

#[tokio::test]
async fn create_account_short_password() {
    let identity = MemoryIdentity::new();
    let err = identity.create_account(&UserId::Unique, "n@b.com", "short", "N").await.unwrap_err();
    assert!(matches!(err, IdentityError::WeakPassword(_)));
}

// =============================================================================
// call log / failure injection
// =============================================================================

#[tokio::test]
async fn calls_are_recorded_in_order() {
    let identity = MemoryIdentity::new().with_account(alice(), "password1");
    let _ = identity.create_session("a@b.com", "password1").await;
    let _ = identity.get_account().await;
    let _ = identity.delete_session(CURRENT_SESSION).await;
    assert_eq!(
        identity.calls(),
        vec![Operation::CreateSession, Operation::GetAccount, Operation::DeleteSession]
    );
}

#[tokio::test]
async fn fail_next_applies_once() {
    let identity = MemoryIdentity::new().with_active_session(alice(), "password1");
    identity.fail_next(Operation::GetAccount, IdentityError::Request("offline".into()));
    assert_eq!(identity.get_account().await.unwrap_err(), IdentityError::Request("offline".into()));
    assert_eq!(identity.get_account().await.unwrap(), alice());
}

#[test]
fn seeding_records_no_calls() {
    let identity = MemoryIdentity::new().with_active_session(alice(), "password1");
    assert!(identity.calls().is_empty());
}
