use chrono::Duration;

use tollgate_domain::directory::UserAttributes;
use tollgate_lifecycle::error::LifecycleError;
use tollgate_lifecycle::usecase::registry::{
    FindStaleUsersUseCase, MarkVerifiedUseCase, ReclaimUserUseCase, RegisterUnverifiedUserUseCase,
    UserIdentity,
};
use tollgate_testing::directory::DirectoryUserBuilder;

use crate::helpers::{InMemoryDirectory, InMemoryStore, USERNAME, fixed_now};

#[tokio::test]
async fn should_keep_first_record_when_registered_twice() {
    let uc = RegisterUnverifiedUserUseCase {
        store: InMemoryStore::default(),
        ttl_minutes: 30,
    };
    let attributes: UserAttributes = [("sub", "user-123")].into_iter().collect();
    let input = || UserIdentity {
        username: USERNAME,
        attributes: &attributes,
    };

    uc.execute(input(), fixed_now()).await.unwrap();
    let after_first = uc.store.records.lock().unwrap().clone();
    let second = uc.execute(input(), fixed_now() + Duration::minutes(1)).await;

    assert!(matches!(second, Err(LifecycleError::AlreadyRegistered)));
    assert_eq!(*uc.store.records.lock().unwrap(), after_first);
}

#[tokio::test]
async fn should_leave_latest_verification_time_when_verified_twice() {
    let store = InMemoryStore::default();
    let attributes = UserAttributes::new();
    let identity = || UserIdentity {
        username: USERNAME,
        attributes: &attributes,
    };
    RegisterUnverifiedUserUseCase {
        store: &store,
        ttl_minutes: 30,
    }
    .execute(identity(), fixed_now())
    .await
    .unwrap();

    let uc = MarkVerifiedUseCase { store: &store };
    let later = fixed_now() + Duration::minutes(10);
    uc.execute(identity(), fixed_now()).await.unwrap();
    uc.execute(identity(), later).await.unwrap();

    let record = store.get(USERNAME).unwrap();
    assert!(record.expires_at.is_none());
    assert_eq!(record.verified_at, Some(later.timestamp()));
    assert_eq!(record.created_at, Some(fixed_now().timestamp()));
}

#[tokio::test]
async fn should_create_verified_record_for_unknown_user() {
    let uc = MarkVerifiedUseCase {
        store: InMemoryStore::default(),
    };

    uc.execute(
        UserIdentity {
            username: "never-registered",
            attributes: &UserAttributes::new(),
        },
        fixed_now(),
    )
    .await
    .unwrap();

    let record = uc.store.get("never-registered").unwrap();
    assert_eq!(record.verified_at, Some(fixed_now().timestamp()));
    assert!(record.expires_at.is_none());
}

#[tokio::test]
async fn should_reject_verification_without_any_identifier() {
    let uc = MarkVerifiedUseCase {
        store: InMemoryStore::default(),
    };

    let result = uc
        .execute(
            UserIdentity {
                username: "",
                attributes: &UserAttributes::new(),
            },
            fixed_now(),
        )
        .await;

    assert!(matches!(result, Err(LifecycleError::MissingIdentifier)));
    assert_eq!(uc.store.len(), 0);
}

#[tokio::test]
async fn should_only_return_candidates_meeting_every_stale_condition() {
    let now = fixed_now();
    let directory = InMemoryDirectory::new(vec![
        DirectoryUserBuilder::new("old-unverified")
            .unconfirmed()
            .created_at(now - Duration::hours(25))
            .unverified_email("a@example.com")
            .build(),
        DirectoryUserBuilder::new("young-unverified")
            .unconfirmed()
            .created_at(now - Duration::hours(23))
            .build(),
        DirectoryUserBuilder::new("old-with-verified-phone")
            .unconfirmed()
            .created_at(now - Duration::hours(48))
            .verified_phone("+15550100")
            .build(),
        DirectoryUserBuilder::new("old-confirmed")
            .created_at(now - Duration::hours(48))
            .build(),
    ]);
    let uc = FindStaleUsersUseCase {
        directory,
        grace_period_hours: 24,
    };

    let page = uc.execute(now, None).await.unwrap();

    let names: Vec<_> = page.items.iter().map(|c| c.username.as_str()).collect();
    assert_eq!(names, vec!["old-unverified"]);
    assert!(page.is_last());
    assert_eq!(
        uc.directory.searches.lock().unwrap()[0].0,
        "status = \"UNCONFIRMED\""
    );
}

#[tokio::test]
async fn should_reclaim_by_subject_identifier() {
    let uc = ReclaimUserUseCase {
        directory: InMemoryDirectory::new(vec![
            DirectoryUserBuilder::new(USERNAME).subject("user-123").build(),
            DirectoryUserBuilder::new("other").build(),
        ]),
    };

    uc.execute("user-123").await.unwrap();
    // absent entries are not an error
    uc.execute("user-123").await.unwrap();

    assert_eq!(uc.directory.usernames(), vec!["other"]);
}
