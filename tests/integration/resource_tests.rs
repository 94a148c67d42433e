//! Resource lifecycle tests against the fake backend.

use std::collections::HashSet;

use seaweedfs_provider::provider::{
    BucketModel, IamAccessKeyModel, IamUserModel, IamUserPolicyModel,
};
use seaweedfs_provider::{Cancellation, ErrorKind, Provider, ProviderConfig, ReadOutcome, Resource};

use crate::common::{ACCESS_KEY, FakeSeaweed, SECRET_KEY, tags};
use crate::init_tracing;

const POLICY: &str = r#"{"Version":"2012-10-17","Statement":[{"Effect":"Allow","Action":["s3:GetObject"],"Resource":["arn:aws:s3:::b1/*"]}]}"#;

// Same document, different key order and whitespace.
const POLICY_REFORMATTED: &str = r#"{
  "Statement": [
    {"Resource": ["arn:aws:s3:::b1/*"], "Action": ["s3:GetObject"], "Effect": "Allow"}
  ],
  "Version": "2012-10-17"
}"#;

#[tokio::test]
async fn test_configure_from_block() {
    let fake = FakeSeaweed::start().await;
    let provider =
        Provider::configure(ProviderConfig::new(fake.uri(), ACCESS_KEY, SECRET_KEY)).unwrap();
    let cancel = Cancellation::never();

    provider
        .bucket()
        .create(&cancel, BucketModel::new("b1"))
        .await
        .unwrap();

    assert!(fake.has_bucket("b1"));
    assert_eq!(provider.client().region(), "us-east-1");
}

#[tokio::test]
async fn test_bucket_lifecycle() {
    init_tracing();
    let fake = FakeSeaweed::start().await;
    let buckets = fake.provider(3).bucket();
    let cancel = Cancellation::never();

    let plan = BucketModel::new("b1").with_tags(tags(&[("env", "prod")]));
    let state = buckets.create(&cancel, plan).await.unwrap();
    assert_eq!(state.id, "b1");
    assert_eq!(state.arn, "arn:aws:s3:::b1");
    assert_eq!(state.tags, tags(&[("env", "prod")]));

    let plan = state.clone().with_tags(tags(&[("env", "dev"), ("team", "x")]));
    let state = buckets.update(&cancel, state, plan).await.unwrap();
    assert_eq!(state.tags.len(), 2);

    let plan = state.clone().with_tags(Default::default());
    let state = buckets.update(&cancel, state, plan).await.unwrap();
    assert!(state.tags.is_empty());

    buckets.delete(&cancel, state.clone()).await.unwrap();
    assert!(!fake.has_bucket("b1"));
    assert!(buckets.read(&cancel, state).await.unwrap().is_gone());
}

#[tokio::test]
async fn test_bucket_create_adopts_existing() {
    let fake = FakeSeaweed::start().await;
    fake.seed_bucket("b1");
    let buckets = fake.provider(3).bucket();

    let state = buckets
        .create(&Cancellation::never(), BucketModel::new("b1"))
        .await
        .unwrap();

    assert_eq!(state.bucket, "b1");
    assert_eq!(fake.calls("CreateBucket"), 1);
    assert_eq!(fake.calls("HeadBucket"), 1);
}

#[tokio::test]
async fn test_bucket_delete_of_absent_bucket_succeeds() {
    let fake = FakeSeaweed::start().await;
    let buckets = fake.provider(3).bucket();

    buckets
        .delete(&Cancellation::never(), BucketModel::new("ghost"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_iam_deletes_of_absent_resources_succeed() {
    let fake = FakeSeaweed::start().await;
    let provider = fake.provider(3);
    let cancel = Cancellation::never();

    provider
        .iam_user()
        .delete(&cancel, IamUserModel::new("ghost"))
        .await
        .unwrap();
    provider
        .iam_access_key()
        .delete(&cancel, IamAccessKeyModel {
            access_key_id: "AKGHOST".into(),
            ..IamAccessKeyModel::new("ghost")
        })
        .await
        .unwrap();
    provider
        .iam_user_policy()
        .delete(&cancel, IamUserPolicyModel::new("ghost", "read", POLICY))
        .await
        .unwrap();

    assert_eq!(fake.calls("DeleteUser"), 1);
    assert_eq!(fake.calls("DeleteAccessKey"), 1);
    assert_eq!(fake.calls("DeleteUserPolicy"), 1);
}

#[tokio::test]
async fn test_bucket_read_after_out_of_band_delete() {
    let fake = FakeSeaweed::start().await;
    let buckets = fake.provider(3).bucket();
    let cancel = Cancellation::never();
    let state = buckets
        .create(&cancel, BucketModel::new("b1"))
        .await
        .unwrap();

    fake.remove_bucket("b1");

    assert_eq!(buckets.read(&cancel, state).await.unwrap(), ReadOutcome::Gone);
}

#[tokio::test]
async fn test_bucket_import() {
    let fake = FakeSeaweed::start().await;
    fake.seed_bucket("b1");
    let buckets = fake.provider(3).bucket();

    let partial = buckets.import("b1").unwrap();
    let state = buckets
        .read(&Cancellation::never(), partial)
        .await
        .unwrap()
        .found()
        .unwrap();

    assert_eq!(state.arn, "arn:aws:s3:::b1");
    assert!(state.tags.is_empty());
}

#[tokio::test]
async fn test_iam_user_lifecycle() {
    let fake = FakeSeaweed::start().await;
    let users = fake.provider(3).iam_user();
    let cancel = Cancellation::never();

    let state = users
        .create(&cancel, IamUserModel::new("alice").with_path("/team/"))
        .await
        .unwrap();
    assert_eq!(state.id, "alice");
    assert_eq!(state.path, "/team/");
    assert_eq!(state.arn, "arn:aws:iam:::user/alice");

    let refreshed = users.read(&cancel, state.clone()).await.unwrap();
    assert_eq!(refreshed, ReadOutcome::Found(state.clone()));

    let err = users
        .update(&cancel, state.clone(), state.clone())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    users.delete(&cancel, state.clone()).await.unwrap();
    assert!(!fake.has_user("alice"));
    assert!(users.read(&cancel, state.clone()).await.unwrap().is_gone());

    // Deleting twice is fine.
    users.delete(&cancel, state).await.unwrap();
}

#[tokio::test]
async fn test_access_key_create_absorbs_service_failures() {
    init_tracing();
    let fake = FakeSeaweed::start().await;
    fake.seed_user("alice");
    fake.fail("CreateAccessKey", 2, 500, "ServiceFailure");
    let keys = fake.provider(5).iam_access_key();

    let state = keys
        .create(&Cancellation::never(), IamAccessKeyModel::new("alice"))
        .await
        .unwrap();

    assert_eq!(fake.calls("CreateAccessKey"), 3);
    assert_eq!(state.user_name, "alice");
    assert_eq!(state.id, state.access_key_id);
    assert!(!state.secret_access_key.is_empty());
    assert_eq!(fake.keys_of("alice").len(), 1);
}

#[tokio::test]
async fn test_access_key_create_gives_up_after_budget() {
    let fake = FakeSeaweed::start().await;
    fake.seed_user("alice");
    fake.fail("CreateAccessKey", 10, 500, "ServiceFailure");
    let keys = fake.provider(2).iam_access_key();

    let err = keys
        .create(&Cancellation::never(), IamAccessKeyModel::new("alice"))
        .await
        .unwrap_err();

    assert!(err.is_service_failure());
    assert_eq!(fake.calls("CreateAccessKey"), 2);
}

#[tokio::test]
async fn test_access_key_create_waits_out_user_visibility() {
    let fake = FakeSeaweed::start().await;
    fake.seed_user("alice");
    // The user exists but is not yet visible to the access key endpoint.
    fake.fail("CreateAccessKey", 1, 404, "NoSuchEntity");
    let keys = fake.provider(3).iam_access_key();

    keys.create(&Cancellation::never(), IamAccessKeyModel::new("alice"))
        .await
        .unwrap();

    assert_eq!(fake.calls("CreateAccessKey"), 2);
}

#[tokio::test]
async fn test_access_key_read_and_delete() {
    let fake = FakeSeaweed::start().await;
    fake.seed_user("alice");
    let keys = fake.provider(3).iam_access_key();
    let cancel = Cancellation::never();

    let state = keys
        .create(&cancel, IamAccessKeyModel::new("alice"))
        .await
        .unwrap();

    let refreshed = keys
        .read(&cancel, state.clone())
        .await
        .unwrap()
        .found()
        .unwrap();
    assert_eq!(refreshed.status, "Active");
    assert_eq!(refreshed.secret_access_key, state.secret_access_key);

    keys.delete(&cancel, state.clone()).await.unwrap();
    assert!(fake.keys_of("alice").is_empty());
    assert!(keys.read(&cancel, state.clone()).await.unwrap().is_gone());

    fake.remove_user("alice");
    assert!(keys.read(&cancel, state.clone()).await.unwrap().is_gone());
    keys.delete(&cancel, state).await.unwrap();
}

#[tokio::test]
async fn test_access_key_import() {
    let fake = FakeSeaweed::start().await;
    fake.seed_user("alice");
    let provider = fake.provider(3);
    let key = provider.client().create_access_key("alice").await.unwrap();
    let keys = provider.iam_access_key();

    let partial = keys
        .import(&format!("alice,{}", key.access_key_id))
        .unwrap();
    let state = keys
        .read(&Cancellation::never(), partial)
        .await
        .unwrap()
        .found()
        .unwrap();

    assert_eq!(state.access_key_id, key.access_key_id);
    assert_eq!(state.status, "Active");
    assert!(state.secret_access_key.is_empty());

    let err = keys.import("alice").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn test_concurrent_access_key_creates_for_one_user() {
    let fake = FakeSeaweed::start().await;
    fake.seed_user("alice");
    let provider = fake.provider(3);

    let mut tasks = Vec::new();
    for _ in 0..4 {
        let keys = provider.iam_access_key();
        tasks.push(tokio::spawn(async move {
            keys.create(&Cancellation::never(), IamAccessKeyModel::new("alice"))
                .await
        }));
    }

    let mut ids = HashSet::new();
    for task in tasks {
        ids.insert(task.await.unwrap().unwrap().access_key_id);
    }

    assert_eq!(ids.len(), 4);
    assert_eq!(fake.keys_of("alice").len(), 4);
    assert_eq!(provider.locks().lock_count(), 1);
}

#[tokio::test]
async fn test_user_policy_keeps_semantically_equal_document() {
    let fake = FakeSeaweed::start().await;
    fake.seed_user("alice");
    let policies = fake.provider(3).iam_user_policy();
    let cancel = Cancellation::never();

    let state = policies
        .create(&cancel, IamUserPolicyModel::new("alice", "read", POLICY))
        .await
        .unwrap();
    assert_eq!(state.id, "alice:read");

    // The backend hands back a reformatted copy.
    fake.seed_policy("alice", "read", POLICY_REFORMATTED);
    let refreshed = policies
        .read(&cancel, state.clone())
        .await
        .unwrap()
        .found()
        .unwrap();
    assert_eq!(refreshed.policy, POLICY);

    // A real change shows up as drift.
    let drifted = POLICY.replace("s3:GetObject", "s3:PutObject");
    fake.seed_policy("alice", "read", &drifted);
    let refreshed = policies
        .read(&cancel, state)
        .await
        .unwrap()
        .found()
        .unwrap();
    assert_eq!(refreshed.policy, drifted);
}

#[tokio::test]
async fn test_user_policy_update_and_delete() {
    let fake = FakeSeaweed::start().await;
    fake.seed_user("alice");
    let policies = fake.provider(3).iam_user_policy();
    let cancel = Cancellation::never();

    let state = policies
        .create(&cancel, IamUserPolicyModel::new("alice", "read", POLICY))
        .await
        .unwrap();

    let plan = IamUserPolicyModel::new("alice", "read", POLICY_REFORMATTED);
    let state = policies.update(&cancel, state, plan).await.unwrap();
    assert_eq!(
        fake.stored_policy("alice", "read").as_deref(),
        Some(POLICY_REFORMATTED)
    );

    policies.delete(&cancel, state.clone()).await.unwrap();
    assert!(fake.stored_policy("alice", "read").is_none());
    assert!(policies.read(&cancel, state.clone()).await.unwrap().is_gone());
    policies.delete(&cancel, state).await.unwrap();
}

#[tokio::test]
async fn test_user_policy_import() {
    let fake = FakeSeaweed::start().await;
    fake.seed_user("alice");
    fake.seed_policy("alice", "read", POLICY);
    let policies = fake.provider(3).iam_user_policy();

    let partial = policies.import("alice:read").unwrap();
    let state = policies
        .read(&Cancellation::never(), partial)
        .await
        .unwrap()
        .found()
        .unwrap();

    assert_eq!(state.user_name, "alice");
    assert_eq!(state.name, "read");
    assert_eq!(state.policy, POLICY);
}

#[tokio::test]
async fn test_cancelled_operation_sends_nothing() {
    let fake = FakeSeaweed::start().await;
    fake.seed_user("alice");
    let keys = fake.provider(3).iam_access_key();
    let (handle, cancel) = Cancellation::new();
    handle.cancel();

    let err = keys
        .create(&cancel, IamAccessKeyModel::new("alice"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert_eq!(fake.calls("CreateAccessKey"), 0);
}
