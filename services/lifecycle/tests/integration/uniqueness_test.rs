use tollgate_domain::directory::{ContactAttribute, UserAttributes};
use tollgate_lifecycle::error::LifecycleError;
use tollgate_lifecycle::usecase::uniqueness::EnforceContactUniquenessUseCase;
use tollgate_testing::directory::DirectoryUserBuilder;

use crate::helpers::InMemoryDirectory;

fn attrs(pairs: &[(&str, &str)]) -> UserAttributes {
    pairs.iter().copied().collect()
}

#[tokio::test]
async fn should_short_circuit_on_verified_email() {
    let directory = InMemoryDirectory::new(vec![
        DirectoryUserBuilder::new("a")
            .verified_email("a@example.com")
            .build(),
        DirectoryUserBuilder::new("b")
            .contact(ContactAttribute::PhoneNumber, "+15550100", false)
            .build(),
    ]);
    let uc = EnforceContactUniquenessUseCase { directory };

    let result = uc
        .execute(&attrs(&[
            ("email", "a@example.com"),
            ("phone_number", "+15550100"),
        ]))
        .await;

    assert!(matches!(result, Err(LifecycleError::ContactInUse)));
    let searches = uc.directory.searches.lock().unwrap();
    assert_eq!(searches.len(), 1);
    assert_eq!(searches[0].0, "email = \"a@example.com\"");
}

#[tokio::test]
async fn should_find_verified_match_on_a_later_page() {
    // 60 unverified holders fill the first page; the verified one sits on page two
    let mut users: Vec<_> = (0..60)
        .map(|i| {
            DirectoryUserBuilder::new(&format!("holder-{i:02}"))
                .unverified_email("shared@example.com")
                .build()
        })
        .collect();
    users.push(
        DirectoryUserBuilder::new("holder-verified")
            .verified_email("shared@example.com")
            .build(),
    );
    let uc = EnforceContactUniquenessUseCase {
        directory: InMemoryDirectory::new(users),
    };

    let result = uc.execute(&attrs(&[("email", "shared@example.com")])).await;

    assert!(matches!(result, Err(LifecycleError::ContactInUse)));
    let searches = uc.directory.searches.lock().unwrap();
    assert_eq!(searches.len(), 2);
    assert!(searches.iter().all(|s| s.1 == 60));
    assert_eq!(searches[1].2.as_deref(), Some("60"));
}

#[tokio::test]
async fn should_allow_contacts_held_only_by_unverified_accounts() {
    let directory = InMemoryDirectory::new(vec![
        DirectoryUserBuilder::new("a")
            .unverified_email("a@example.com")
            .build(),
        DirectoryUserBuilder::new("b")
            .contact(ContactAttribute::PhoneNumber, "+15550100", false)
            .build(),
    ]);
    let uc = EnforceContactUniquenessUseCase { directory };

    uc.execute(&attrs(&[
        ("email", "a@example.com"),
        ("phone_number", "+15550100"),
    ]))
    .await
    .unwrap();

    assert_eq!(uc.directory.search_count(), 2);
}

#[tokio::test]
async fn should_skip_search_for_blank_contacts() {
    let uc = EnforceContactUniquenessUseCase {
        directory: InMemoryDirectory::empty(),
    };

    uc.execute(&attrs(&[("email", ""), ("phone_number", "")]))
        .await
        .unwrap();

    assert_eq!(uc.directory.search_count(), 0);
}

#[tokio::test]
async fn should_map_directory_failure_to_retryable_error() {
    let mut directory = InMemoryDirectory::empty();
    directory.fail_search = true;
    let uc = EnforceContactUniquenessUseCase { directory };

    let result = uc.execute(&attrs(&[("phone_number", "+15550100")])).await;

    let err = result.unwrap_err();
    assert!(matches!(err, LifecycleError::ContactCheckUnavailable(_)));
    assert_eq!(
        err.to_string(),
        "Unable to validate contact information. Please try again."
    );
}
