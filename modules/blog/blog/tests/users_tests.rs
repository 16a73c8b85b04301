#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Integration tests for users and their one-to-one / one-to-many relations

mod common;

use blog::domain::error::DomainError;
use blog::{
    CountryPatch, NewCompany, NewContact, NewCountry, NewJob, NewPhoneNumber, NewUser, OfManyKey,
    Trashed, UserPatch,
};
use common::{create_post, create_user, ids, start};
use time::macros::datetime;

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let blog = start().await;
    let service = blog.service();
    create_user(service, "Ada").await;

    let err = service
        .create_user(NewUser {
            country_id: None,
            name: "Other Ada".to_owned(),
            email: "  ada@example.com ".to_owned(),
            password: "another password".to_owned(),
            balance: 0,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::EmailAlreadyExists { .. }));
    assert_eq!(service.count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn test_invalid_input_is_rejected_before_storage() {
    let blog = start().await;
    let service = blog.service();

    let err = service
        .create_user(NewUser {
            country_id: None,
            name: "Bob".to_owned(),
            email: "not-an-email".to_owned(),
            password: "long enough password".to_owned(),
            balance: 0,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidEmail { .. }));

    let err = service
        .create_user(NewUser {
            country_id: None,
            name: "Bob".to_owned(),
            email: "bob@example.com".to_owned(),
            password: "short".to_owned(),
            balance: 0,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "password"));
    assert_eq!(service.count_users().await.unwrap(), 0);
}

#[tokio::test]
async fn test_password_is_hashed_and_verifiable() {
    let blog = start().await;
    let service = blog.service();
    let user = create_user(service, "Grace").await;

    assert!(service
        .verify_password(user.id, "correct horse battery")
        .await
        .unwrap());
    assert!(!service.verify_password(user.id, "wrong").await.unwrap());

    let err = service.verify_password(999, "anything").await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity: "User", id: 999 }));
}

#[tokio::test]
async fn test_update_user_and_find_by_email() {
    let blog = start().await;
    let service = blog.service();
    let user = create_user(service, "Linus").await;

    let updated = service
        .update_user(
            user.id,
            UserPatch {
                name: Some("Linus T".to_owned()),
                balance: Some(250),
                ..UserPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Linus T");
    assert_eq!(updated.balance, 250);

    let found = service
        .find_user_by_email("linus@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, user.id);
    assert!(service
        .find_user_by_email("nobody@example.com")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_user_posts_are_ordered_and_scoped() {
    let blog = start().await;
    let service = blog.service();
    let alice = create_user(service, "Alice").await;
    let bob = create_user(service, "Bob").await;

    let first = create_post(service, alice.id, "First").await;
    create_post(service, bob.id, "Bob's post").await;
    let second = create_post(service, alice.id, "Second").await;

    let posts = service.user_posts(alice.id, Trashed::Exclude).await.unwrap();
    assert_eq!(ids(&posts, |p| p.id), vec![first.id, second.id]);
    assert!(posts.iter().all(|p| p.user_id == alice.id));

    let author = service.post_author(second.id).await.unwrap().unwrap();
    assert_eq!(author.id, alice.id);
}

#[tokio::test]
async fn test_contact_is_one_to_one() {
    let blog = start().await;
    let service = blog.service();
    let user = create_user(service, "Carol").await;
    assert!(service.user_contact(user.id).await.unwrap().is_none());

    service
        .put_contact(
            user.id,
            NewContact {
                phone: "+1 555 0100".to_owned(),
                address: None,
            },
        )
        .await
        .unwrap();
    let replaced = service
        .put_contact(
            user.id,
            NewContact {
                phone: "+1 555 0199".to_owned(),
                address: Some("1 Main St".to_owned()),
            },
        )
        .await
        .unwrap();

    let contact = service.user_contact(user.id).await.unwrap().unwrap();
    assert_eq!(contact, replaced);
    assert_eq!(contact.phone, "+1 555 0199");
}

#[tokio::test]
async fn test_phone_number_through_company() {
    let blog = start().await;
    let service = blog.service();
    let user = create_user(service, "Dave").await;
    assert!(service.user_phone_number(user.id).await.unwrap().is_none());

    let company = service
        .create_company(NewCompany {
            user_id: user.id,
            name: "Acme".to_owned(),
        })
        .await
        .unwrap();
    let phone = service
        .add_phone_number(NewPhoneNumber {
            company_id: company.id,
            number: "+44 20 7946 0000".to_owned(),
        })
        .await
        .unwrap();

    assert_eq!(service.user_phone_number(user.id).await.unwrap(), Some(phone.clone()));
    assert_eq!(service.company_phone(company.id).await.unwrap(), Some(phone));
    assert_eq!(
        ids(&service.user_companies(user.id).await.unwrap(), |c| c.id),
        vec![company.id]
    );

    let renamed = service.rename_company(company.id, "Acme Ltd").await.unwrap();
    assert_eq!(renamed.name, "Acme Ltd");
}

#[tokio::test]
async fn test_latest_and_oldest_job() {
    let blog = start().await;
    let service = blog.service();
    let user = create_user(service, "Erin").await;
    assert!(service.latest_job(user.id, OfManyKey::Id).await.unwrap().is_none());

    // Inserted out of chronological order so id and created_at disagree.
    let recent = service
        .create_job(NewJob {
            user_id: user.id,
            title: "Staff Engineer".to_owned(),
            created_at: Some(datetime!(2024-06-01 0:00 UTC)),
        })
        .await
        .unwrap();
    let early = service
        .create_job(NewJob {
            user_id: user.id,
            title: "Intern".to_owned(),
            created_at: Some(datetime!(2019-06-01 0:00 UTC)),
        })
        .await
        .unwrap();

    let latest_by_id = service.latest_job(user.id, OfManyKey::Id).await.unwrap().unwrap();
    assert_eq!(latest_by_id.id, early.id);
    let oldest_by_id = service.oldest_job(user.id, OfManyKey::Id).await.unwrap().unwrap();
    assert_eq!(oldest_by_id.id, recent.id);

    let latest = service
        .latest_job(user.id, OfManyKey::CreatedAt)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.id, recent.id);
    let oldest = service
        .oldest_job(user.id, OfManyKey::CreatedAt)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(oldest.id, early.id);
}

#[tokio::test]
async fn test_job_ordering_compares_instants_across_offsets() {
    let blog = start().await;
    let service = blog.service();
    let user = create_user(service, "Farah").await;

    // 10:00 +05:00 is 05:00 UTC, an hour before the second job.
    let earlier = service
        .create_job(NewJob {
            user_id: user.id,
            title: "Analyst".to_owned(),
            created_at: Some(datetime!(2024-01-01 10:00 +5)),
        })
        .await
        .unwrap();
    let later = service
        .create_job(NewJob {
            user_id: user.id,
            title: "Lead".to_owned(),
            created_at: Some(datetime!(2024-01-01 6:00 UTC)),
        })
        .await
        .unwrap();
    assert_eq!(earlier.created_at, datetime!(2024-01-01 5:00 UTC));

    let latest = service
        .latest_job(user.id, OfManyKey::CreatedAt)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.id, later.id);
    let oldest = service
        .oldest_job(user.id, OfManyKey::CreatedAt)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(oldest.id, earlier.id);
}

#[tokio::test]
async fn test_country_through_users_to_posts() {
    let blog = start().await;
    let service = blog.service();
    let country = service
        .create_country(NewCountry {
            name: "Norway".to_owned(),
            code: "no".to_owned(),
        })
        .await
        .unwrap();
    assert_eq!(country.code, "NO");

    let local = service
        .create_user(NewUser {
            country_id: Some(country.id),
            name: "Ola".to_owned(),
            email: "ola@example.com".to_owned(),
            password: "correct horse battery".to_owned(),
            balance: 0,
        })
        .await
        .unwrap();
    let abroad = create_user(service, "Frank").await;

    let kept = create_post(service, local.id, "Fjords").await;
    let trashed = create_post(service, local.id, "Winter").await;
    create_post(service, abroad.id, "Elsewhere").await;
    service.delete_post(trashed.id).await.unwrap();

    let users = service.country_users(country.id).await.unwrap();
    assert_eq!(ids(&users, |u| u.id), vec![local.id]);

    let posts = service.country_posts(country.id, Trashed::Exclude).await.unwrap();
    assert_eq!(ids(&posts, |p| p.id), vec![kept.id]);
    let all = service.country_posts(country.id, Trashed::Include).await.unwrap();
    assert_eq!(all.len(), 2);

    let renamed = service
        .update_country(
            country.id,
            CountryPatch {
                name: Some("Kingdom of Norway".to_owned()),
                code: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Kingdom of Norway");
}

#[tokio::test]
async fn test_deleting_country_detaches_users() {
    let blog = start().await;
    let service = blog.service();
    let country = service
        .create_country(NewCountry {
            name: "Chile".to_owned(),
            code: "CL".to_owned(),
        })
        .await
        .unwrap();
    let user = service
        .create_user(NewUser {
            country_id: Some(country.id),
            name: "Pablo".to_owned(),
            email: "pablo@example.com".to_owned(),
            password: "correct horse battery".to_owned(),
            balance: 0,
        })
        .await
        .unwrap();

    service.delete_country(country.id).await.unwrap();

    assert_eq!(service.get_user(user.id).await.unwrap().country_id, None);
}

#[tokio::test]
async fn test_deleting_user_removes_owned_rows() {
    let blog = start().await;
    let service = blog.service();
    let user = create_user(service, "Heidi").await;
    let other = create_user(service, "Ivan").await;
    let post = create_post(service, user.id, "Going away").await;
    let survivor = create_post(service, other.id, "Still here").await;

    service.delete_user(user.id).await.unwrap();

    assert!(matches!(
        service.get_user(user.id).await.unwrap_err(),
        DomainError::NotFound { .. }
    ));
    assert!(service.get_post(post.id, Trashed::Include).await.is_err());
    assert!(service.get_post(survivor.id, Trashed::Exclude).await.is_ok());
    assert_eq!(service.user_ids().await.unwrap(), vec![other.id]);
}
