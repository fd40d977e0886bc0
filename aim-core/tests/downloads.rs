// aim-core/tests/downloads.rs
mod common;

use aim_common::error::AimError;
use aim_common::model::UserCredentials;
use common::{properties_json, sha256_hex, v, Fixture, TOKEN};

fn credentials() -> UserCredentials {
    UserCredentials::new(TOKEN, None)
}

fn files_in(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

#[tokio::test]
async fn test_downloaded_artifacts_exclude_corrupted_and_empty() {
    let fixture = Fixture::new("1.0.0", u64::MAX);
    let good = fixture.place_download("cdec", "2.10.5", b"good bundle", b"good bundle");
    fixture.place_download("cdec", "2.10.6", b"corrupted", b"expected bundle");
    fixture.place_download("installation-manager", "1.0.1", b"stale", b"fresh");
    std::fs::create_dir_all(fixture.download_dir().join("cdec").join("not-a-version")).unwrap();

    let index = fixture.manager.get_downloaded_artifacts().await.unwrap();

    assert_eq!(index.len(), 1);
    let cdec = index.get(&fixture.artifact("cdec")).unwrap();
    assert_eq!(cdec.len(), 1);
    assert_eq!(cdec.get(&v("2.10.5")), Some(&good));
    assert!(!index.contains_key(&fixture.artifact("installation-manager")));
}

#[tokio::test]
async fn test_downloaded_versions_are_ascending() {
    let fixture = Fixture::new("1.0.0", u64::MAX);
    for version in ["2.10.10", "2.9.0", "2.10.5"] {
        fixture.place_download("cdec", version, version.as_bytes(), version.as_bytes());
    }

    let index = fixture.manager.get_downloaded_artifacts().await.unwrap();
    let versions: Vec<String> = index[&fixture.artifact("cdec")]
        .keys()
        .map(|v| v.to_string())
        .collect();
    assert_eq!(versions, vec!["2.9.0", "2.10.5", "2.10.10"]);
}

#[tokio::test]
async fn test_metadata_failure_aborts_scan() {
    let fixture = Fixture::new("1.0.0", u64::MAX);
    fixture.place_download("cdec", "2.10.5", b"bundle", b"bundle");
    std::fs::create_dir_all(fixture.download_dir().join("cdec").join("2.10.7")).unwrap();

    let result = fixture.manager.get_downloaded_artifacts().await;
    assert!(matches!(result, Err(AimError::RepositoryUnavailable { .. })));
}

#[test]
fn test_disk_space_check_reports_both_numbers() {
    let fixture = Fixture::new("1.0.0", 1024);

    assert!(fixture.manager.check_enough_disk_space(1024).is_ok());
    let err = fixture.manager.check_enough_disk_space(4096).unwrap_err();
    assert!(matches!(
        err,
        AimError::InsufficientDiskSpace {
            required: 4096,
            available: 1024
        }
    ));
    let message = err.to_string();
    assert!(message.contains("4096"));
    assert!(message.contains("1024"));
}

#[tokio::test]
async fn test_public_download_is_verified_and_stored() {
    let fixture = Fixture::new("1.0.0", u64::MAX);
    let content = b"aim 1.0.1 binary";
    fixture.transport.respond(
        "repository/properties/installation-manager/1.0.1",
        &properties_json("1.0.1", "aim-1.0.1", content),
    );
    fixture
        .transport
        .serve_binary("repository/public/download/installation-manager/1.0.1", content);
    let artifact = fixture.artifact("installation-manager");

    let path = fixture
        .manager
        .download(&credentials(), &artifact, &v("1.0.1"))
        .await
        .unwrap();

    assert_eq!(
        path,
        fixture
            .download_dir()
            .join("installation-manager")
            .join("1.0.1")
            .join("aim-1.0.1")
    );
    assert_eq!(std::fs::read(&path).unwrap(), content);
    assert_eq!(
        fixture.transport.downloads(),
        vec![(
            "http://update.com/endpoint/repository/public/download/installation-manager/1.0.1"
                .to_string(),
            None
        )]
    );

    // A verified copy is not fetched again.
    fixture
        .manager
        .download(&credentials(), &artifact, &v("1.0.1"))
        .await
        .unwrap();
    assert_eq!(fixture.transport.downloads().len(), 1);
}

#[tokio::test]
async fn test_checksum_mismatch_removes_partial_file() {
    let fixture = Fixture::new("1.0.0", u64::MAX);
    fixture.transport.respond(
        "repository/properties/cdec/2.10.5",
        &properties_json("2.10.5", "cdec-2.10.5.zip", b"the real bundle"),
    );
    fixture
        .transport
        .serve_binary("repository/public/download/cdec/2.10.5", b"tampered");
    let artifact = fixture.artifact("cdec");

    let err = fixture
        .manager
        .download(&credentials(), &artifact, &v("2.10.5"))
        .await
        .unwrap_err();

    match err {
        AimError::IntegrityCheckFailed {
            artifact,
            version,
            expected,
            actual,
        } => {
            assert_eq!(artifact, "cdec");
            assert_eq!(version, "2.10.5");
            assert_eq!(expected, sha256_hex(b"the real bundle"));
            assert_eq!(actual, sha256_hex(b"tampered"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let version_dir = fixture.download_dir().join("cdec").join("2.10.5");
    assert!(files_in(&version_dir).is_empty());
}

#[tokio::test]
async fn test_download_needs_free_space_for_size() {
    let fixture = Fixture::new("1.0.0", 4);
    fixture.transport.respond(
        "repository/properties/cdec/2.10.5",
        &properties_json("2.10.5", "cdec-2.10.5.zip", b"larger than four bytes"),
    );
    let artifact = fixture.artifact("cdec");

    let err = fixture
        .manager
        .download(&credentials(), &artifact, &v("2.10.5"))
        .await
        .unwrap_err();
    assert!(matches!(err, AimError::InsufficientDiskSpace { required: 22, available: 4 }));
    assert!(fixture.transport.downloads().is_empty());
}

fn protected_properties(fixture: &Fixture, subscription: Option<&str>) {
    let content = b"protected bundle";
    let subscription = subscription
        .map(|s| format!(r#","subscription":"{s}""#))
        .unwrap_or_default();
    fixture.transport.respond(
        "repository/properties/cdec/3.0.0",
        &format!(
            r#"{{"version":"3.0.0","file":"cdec-3.0.0.zip","sha256":"{}","authenticationRequired":true{}}}"#,
            sha256_hex(content),
            subscription
        ),
    );
    fixture
        .transport
        .serve_binary("repository/download/cdec/3.0.0/owner-acc", content);
}

#[tokio::test]
async fn test_protected_download_without_owner_account_is_denied() {
    let fixture = Fixture::new("1.0.0", u64::MAX);
    protected_properties(&fixture, None);
    fixture.transport.respond(
        "api.com/api/account",
        r#"[{"roles":["account/member"],"accountReference":{"id":"member-acc"}}]"#,
    );
    let artifact = fixture.artifact("cdec");

    let err = fixture
        .manager
        .download(&credentials(), &artifact, &v("3.0.0"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AimError::AccessDenied { ref artifact, ref version, .. } if artifact == "cdec" && version == "3.0.0"
    ));
    assert!(fixture.transport.downloads().is_empty());
}

#[tokio::test]
async fn test_protected_download_without_subscription_is_denied() {
    let fixture = Fixture::new("1.0.0", u64::MAX);
    protected_properties(&fixture, Some("OnPremises"));
    fixture.transport.respond(
        "api.com/api/account",
        r#"[{"roles":["account/owner"],"accountReference":{"id":"owner-acc"}}]"#,
    );
    fixture
        .transport
        .respond("account/owner-acc/subscriptions", r#"[{"serviceId":"Saas"}]"#);
    let artifact = fixture.artifact("cdec");

    let result = fixture
        .manager
        .download(&credentials(), &artifact, &v("3.0.0"))
        .await;
    assert!(matches!(result, Err(AimError::AccessDenied { .. })));
}

#[tokio::test]
async fn test_entitled_download_uses_account_url_and_token() {
    let fixture = Fixture::new("1.0.0", u64::MAX);
    protected_properties(&fixture, Some("OnPremises"));
    fixture.transport.respond(
        "api.com/api/account",
        r#"[{"roles":["account/owner"],"accountReference":{"id":"owner-acc"}}]"#,
    );
    fixture
        .transport
        .respond("account/owner-acc/subscriptions", r#"[{"serviceId":"OnPremises"}]"#);
    let artifact = fixture.artifact("cdec");

    let creds = UserCredentials::new(TOKEN, Some("owner-acc".to_string()));
    let path = fixture
        .manager
        .download(&creds, &artifact, &v("3.0.0"))
        .await
        .unwrap();

    assert!(path.ends_with("cdec/3.0.0/cdec-3.0.0.zip"));
    assert_eq!(
        fixture.transport.downloads(),
        vec![(
            "http://update.com/endpoint/repository/download/cdec/3.0.0/owner-acc".to_string(),
            Some(TOKEN.to_string())
        )]
    );
}

#[tokio::test]
async fn test_download_latest_resolves_version() {
    let fixture = Fixture::new("1.0.0", u64::MAX);
    let content = b"aim 1.1.0";
    let props = properties_json("1.1.0", "aim-1.1.0", content);
    fixture
        .transport
        .respond("repository/properties/installation-manager", &props);
    fixture
        .transport
        .respond("repository/properties/installation-manager/1.1.0", &props);
    fixture
        .transport
        .serve_binary("repository/public/download/installation-manager/1.1.0", content);
    let artifact = fixture.artifact("installation-manager");

    let (version, path) = fixture
        .manager
        .download_latest(&credentials(), &artifact)
        .await
        .unwrap();
    assert_eq!(version, v("1.1.0"));
    assert!(path.is_file());

    let properties = fixture
        .manager
        .get_artifact_properties(&artifact, None)
        .await
        .unwrap();
    assert_eq!(properties.size(), Some(content.len() as u64));
}

#[tokio::test]
async fn test_file_name_outside_version_directory_is_rejected() {
    let fixture = Fixture::new("1.0.0", u64::MAX);
    fixture.transport.respond(
        "repository/properties/cdec/2.10.5",
        &properties_json("2.10.5", "../../../escaped.bin", b"bundle"),
    );
    fixture
        .transport
        .serve_binary("repository/public/download/cdec/2.10.5", b"bundle");
    let artifact = fixture.artifact("cdec");

    let err = fixture
        .manager
        .download(&credentials(), &artifact, &v("2.10.5"))
        .await
        .unwrap_err();

    assert!(matches!(err, AimError::PropertyValidation { ref property, .. } if property == "file"));
    assert!(fixture.transport.downloads().is_empty());
    assert!(!fixture.dir.path().join("escaped.bin").exists());
    assert!(!fixture.download_dir().join("cdec").exists());
}

#[tokio::test]
async fn test_concurrent_downloads_of_one_target_fetch_once() {
    let fixture = Fixture::new("1.0.0", u64::MAX);
    let content = b"cdec 2.10.5 bundle";
    fixture.transport.respond(
        "repository/properties/cdec/2.10.5",
        &properties_json("2.10.5", "cdec-2.10.5.zip", content),
    );
    fixture
        .transport
        .serve_binary("repository/public/download/cdec/2.10.5", content);
    let artifact = fixture.artifact("cdec");
    let credentials = credentials();
    let version = v("2.10.5");

    let (first, second) = tokio::join!(
        fixture.manager.download(&credentials, &artifact, &version),
        fixture.manager.download(&credentials, &artifact, &version),
    );

    let first = first.unwrap();
    assert_eq!(first, second.unwrap());
    assert_eq!(std::fs::read(&first).unwrap(), content);
    assert_eq!(fixture.transport.downloads().len(), 1);
    assert_eq!(
        files_in(&fixture.download_dir().join("cdec").join("2.10.5")),
        vec!["cdec-2.10.5.zip"]
    );
    assert_eq!(fixture.manager.active_downloads(), 0);
}
