use passbook::cli::Command;
use passbook::handlers::{Outcome, execute, run};
use passbook::service::{AccountService, PasswordGenerator};
use passbook::{VaultError, db};
use std::{
    fs,
    path::PathBuf,
    sync::atomic::{AtomicUsize, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_db_path(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!(
        "passbook-svc-{tag}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));
    temp_path
}

/// Hands out `pw-1`, `pw-2`, ... so tests can tell generated passwords apart.
#[derive(Default)]
struct Sequence(AtomicUsize);

impl PasswordGenerator for Sequence {
    fn generate(&self) -> String {
        format!("pw-{}", self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[tokio::test]
async fn github_alice_scenario() {
    let path = temp_db_path("scenario");
    let store = db::spawn(&path).await.expect("spawn store");
    let service = AccountService::with_generator(store, Sequence::default());

    assert!(service.add_account("github", "alice").await.unwrap());
    assert!(!service.add_account("github", "alice").await.unwrap());

    let account = service
        .get_account("github", "alice")
        .await
        .unwrap()
        .expect("alice should exist");
    assert_eq!(account.service, "github");
    assert_eq!(account.username, "alice");
    assert_eq!(account.password, "pw-1");

    assert_eq!(service.get_account("github", "bob").await.unwrap(), None);

    service.close().await;
    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn random_passwords_are_stored() {
    let path = temp_db_path("random");
    let store = db::spawn(&path).await.expect("spawn store");
    let service = AccountService::new(store);

    assert!(service.add_account("mail", "alice").await.unwrap());
    assert!(service.add_account("mail", "bob").await.unwrap());

    let alice = service.get_account("mail", "alice").await.unwrap().unwrap();
    let bob = service.get_account("mail", "bob").await.unwrap().unwrap();
    assert_eq!(alice.password.len(), 44);
    assert_eq!(bob.password.len(), 44);
    assert_ne!(alice.password, bob.password);

    service.close().await;
    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn commands_render_each_outcome() {
    let path = temp_db_path("commands");
    let store = db::spawn(&path).await.expect("spawn store");
    let service = AccountService::with_generator(store, Sequence::default());

    let outcome = execute(Command::Init, &service).await;
    assert!(matches!(&outcome, Outcome::Ready(p) if *p == path));

    let new = || Command::New {
        service: "github".into(),
        username: "alice".into(),
    };
    let outcome = execute(new(), &service).await;
    assert!(matches!(outcome, Outcome::Created { .. }));
    assert_eq!(outcome.to_string(), "Success! Now try `get github alice`.");

    let outcome = execute(new(), &service).await;
    assert!(matches!(outcome, Outcome::AlreadyExists { .. }));
    assert!(outcome.to_string().contains("github+alice already exists"));

    let outcome = execute(
        Command::Get {
            service: "github".into(),
            username: "alice".into(),
        },
        &service,
    )
    .await;
    assert_eq!(outcome.to_string(), "github+alice = pw-1");

    let outcome = execute(
        Command::Get {
            service: "github".into(),
            username: "bob".into(),
        },
        &service,
    )
    .await;
    assert!(matches!(outcome, Outcome::NotFound));

    let outcome = execute(Command::Destroy, &service).await;
    assert!(matches!(outcome, Outcome::Destroyed), "{outcome}");
    assert!(!path.exists());

    // The store is gone with the file.
    let outcome = execute(new(), &service).await;
    assert!(matches!(outcome, Outcome::Failed(_)));
}

#[tokio::test]
async fn destroy_reports_missing_file() {
    let path = temp_db_path("destroy-missing");
    let store = db::spawn(&path).await.expect("spawn store");
    let service = AccountService::new(store);

    fs::remove_file(&path).unwrap();

    let outcome = execute(Command::Destroy, &service).await;
    assert!(matches!(outcome, Outcome::DestroyFailed(_)));
    assert!(
        outcome
            .to_string()
            .starts_with("Failed to destroy the database")
    );
}

#[tokio::test]
async fn run_closes_store_after_command() {
    let path = temp_db_path("run-closes");
    let store = db::spawn(&path).await.expect("spawn store");
    let service = AccountService::with_generator(store, Sequence::default());

    let outcome = run(
        Command::New {
            service: "github".into(),
            username: "alice".into(),
        },
        &service,
    )
    .await;
    assert!(matches!(outcome, Outcome::Created { .. }));
    assert!(matches!(
        service.get_account("github", "alice").await,
        Err(VaultError::StoreClosed)
    ));

    // The record survived the close.
    let store = db::spawn(&path).await.expect("reopen store");
    let service = AccountService::new(store);
    let outcome = run(
        Command::Get {
            service: "github".into(),
            username: "alice".into(),
        },
        &service,
    )
    .await;
    assert_eq!(outcome.to_string(), "github+alice = pw-1");

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn run_destroy_removes_file() {
    let path = temp_db_path("run-destroy");
    let store = db::spawn(&path).await.expect("spawn store");
    let service = AccountService::new(store);

    let outcome = run(Command::Destroy, &service).await;
    assert!(matches!(outcome, Outcome::Destroyed), "{outcome}");
    assert!(!path.exists());
}
