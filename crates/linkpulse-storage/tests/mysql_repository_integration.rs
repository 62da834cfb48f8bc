//! These tests start a MySQL container and need a local Docker daemon:
//! `cargo test -p linkpulse-storage -- --ignored`.

use std::time::Duration;

use jiff::{SignedDuration, Timestamp};
use linkpulse_core::{Browser, ClientInfo, Device, NewShortLink, Os, Owner, ShortId, VisitRecord};
use linkpulse_storage::{MySqlRepository, ReadRepository, Repository, StorageError};
use linkpulse_test_infra::mysql::{MySqlServer, MysqlConfig};
use sqlx::mysql::MySqlPoolOptions;
use sqlx::Executor;

struct Fixture {
    mysql: MySqlServer,
    repo: MySqlRepository,
}

impl Fixture {
    async fn start() -> Self {
        let mysql = MySqlServer::new(MysqlConfig::builder().build())
            .await
            .expect("start mysql");
        let url = mysql.database_url().await.expect("mysql url");
        let pool = connect_with_retry(&url).await;

        let repo = MySqlRepository::new(pool);
        repo.migrate().await.expect("apply migrations");

        Self { mysql, repo }
    }
}

async fn connect_with_retry(url: &str) -> sqlx::MySqlPool {
    let mut last_error = None;

    for _ in 0..20 {
        match MySqlPoolOptions::new()
            .max_connections(16)
            .connect(url)
            .await
        {
            Ok(pool) => return pool,
            Err(err) => {
                last_error = Some(err);
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        }
    }

    panic!("failed to connect mysql: {last_error:?}");
}

/// A second pool whose sessions default to `READ COMMITTED`.
async fn connect_read_committed(url: &str) -> sqlx::MySqlPool {
    MySqlPoolOptions::new()
        .max_connections(8)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute("SET SESSION TRANSACTION ISOLATION LEVEL READ COMMITTED")
                    .await?;
                Ok(())
            })
        })
        .connect(url)
        .await
        .expect("connect read-committed pool")
}

fn id(value: &str) -> ShortId {
    ShortId::new_unchecked(value)
}

fn owner(value: &str) -> Owner {
    Owner::new(value).unwrap()
}

fn new_link(owner_id: &str, url: &str) -> NewShortLink {
    NewShortLink {
        owner: owner(owner_id),
        long_url: url.to_string(),
        created_at: Timestamp::now(),
    }
}

fn visit(referrer: Option<&str>) -> VisitRecord {
    VisitRecord::new(
        Timestamp::now(),
        referrer,
        "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Safari/604.1 Mobile",
        ClientInfo {
            browser: Browser::Safari,
            os: Os::MacOs,
            device: Device::Mobile,
        },
    )
}

#[tokio::test]
#[ignore = "requires docker"]
async fn insert_and_get_round_trip() {
    let fixture = Fixture::start().await;

    let stored = fixture
        .repo
        .insert(&id("abc123"), new_link("alice", "https://example.com"))
        .await
        .unwrap();

    let got = fixture.repo.get(&id("abc123")).await.unwrap().unwrap();
    assert_eq!(got.long_url, "https://example.com");
    assert_eq!(got.owner, owner("alice"));
    assert_eq!(got.click_count, 0);
    assert!(got.visits.is_empty());
    assert_eq!(
        got.created_at.as_microsecond(),
        stored.created_at.as_microsecond()
    );
}

#[tokio::test]
#[ignore = "requires docker"]
async fn insert_conflicts_when_id_already_exists() {
    let fixture = Fixture::start().await;

    fixture
        .repo
        .insert(&id("abc123"), new_link("alice", "https://one.example"))
        .await
        .unwrap();

    let err = fixture
        .repo
        .insert(&id("abc123"), new_link("bob", "https://two.example"))
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::Conflict(_)));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn ids_differing_only_in_case_are_distinct() {
    let fixture = Fixture::start().await;

    fixture
        .repo
        .insert(&id("AbCd1234"), new_link("alice", "https://upper.example"))
        .await
        .unwrap();
    fixture
        .repo
        .insert(&id("abcd1234"), new_link("alice", "https://lower.example"))
        .await
        .unwrap();

    let upper = fixture.repo.get(&id("AbCd1234")).await.unwrap().unwrap();
    assert_eq!(upper.long_url, "https://upper.example");
}

#[tokio::test]
#[ignore = "requires docker"]
async fn owners_differing_only_in_case_are_distinct() {
    let fixture = Fixture::start().await;

    fixture
        .repo
        .insert(&id("abc123"), new_link("alice", "https://example.com"))
        .await
        .unwrap();

    assert!(fixture
        .repo
        .list_by_owner(&owner("Alice"))
        .await
        .unwrap()
        .is_empty());
    assert!(!fixture
        .repo
        .delete(&id("abc123"), &owner("Alice"))
        .await
        .unwrap());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn record_visit_appends_and_counts() {
    let fixture = Fixture::start().await;
    fixture
        .repo
        .insert(&id("abc123"), new_link("alice", "https://example.com"))
        .await
        .unwrap();

    let target = fixture
        .repo
        .record_visit(&id("abc123"), visit(Some("https://t.co/xyz")))
        .await
        .unwrap();
    assert_eq!(target.as_deref(), Some("https://example.com"));
    fixture
        .repo
        .record_visit(&id("abc123"), visit(None))
        .await
        .unwrap();

    let got = fixture.repo.get(&id("abc123")).await.unwrap().unwrap();
    assert_eq!(got.click_count, 2);
    assert_eq!(got.visits.len(), 2);
    assert_eq!(got.visits[0].referrer, "https://t.co/xyz");
    assert_eq!(got.visits[1].referrer, "Direct");
    assert_eq!(got.visits[0].os, Os::MacOs);
    assert_eq!(got.visits[0].device, Device::Mobile);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn record_visit_on_unknown_id_returns_none() {
    let fixture = Fixture::start().await;

    let target = fixture
        .repo
        .record_visit(&id("missing"), visit(None))
        .await
        .unwrap();
    assert!(target.is_none());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn concurrent_visits_are_serialized() {
    let fixture = Fixture::start().await;
    fixture
        .repo
        .insert(&id("hot"), new_link("alice", "https://example.com"))
        .await
        .unwrap();

    let mut handles = vec![];
    for _ in 0..100 {
        let repo = fixture.repo.clone();
        handles.push(tokio::spawn(async move {
            repo.record_visit(&id("hot"), visit(None)).await.unwrap()
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().is_some());
    }

    let got = fixture.repo.get(&id("hot")).await.unwrap().unwrap();
    assert_eq!(got.click_count, 100);
    assert_eq!(got.visits.len(), 100);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
#[ignore = "requires docker"]
async fn reads_see_one_snapshot_under_read_committed_sessions() {
    let fixture = Fixture::start().await;
    let url = fixture.mysql.database_url().await.unwrap();
    let reader = MySqlRepository::new(connect_read_committed(&url).await);
    fixture
        .repo
        .insert(&id("hot"), new_link("alice", "https://example.com"))
        .await
        .unwrap();

    let mut writers = vec![];
    for _ in 0..8 {
        let repo = fixture.repo.clone();
        writers.push(tokio::spawn(async move {
            for _ in 0..25 {
                repo.record_visit(&id("hot"), visit(None)).await.unwrap();
            }
        }));
    }

    let mut readers = vec![];
    for _ in 0..4 {
        let reader = reader.clone();
        readers.push(tokio::spawn(async move {
            for _ in 0..50 {
                let got = reader.get(&id("hot")).await.unwrap().unwrap();
                assert_eq!(got.click_count as usize, got.visits.len());

                let listed = reader.list_by_owner(&owner("alice")).await.unwrap();
                assert_eq!(listed[0].click_count as usize, listed[0].visits.len());
            }
        }));
    }

    for handle in writers.into_iter().chain(readers) {
        handle.await.unwrap();
    }

    let got = reader.get(&id("hot")).await.unwrap().unwrap();
    assert_eq!(got.click_count, 200);
    assert_eq!(got.visits.len(), 200);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn list_by_owner_groups_visits_per_link() {
    let fixture = Fixture::start().await;
    let now = Timestamp::now();

    for (code, age) in [("older", 60), ("newer", 0)] {
        let link = NewShortLink {
            owner: owner("alice"),
            long_url: format!("https://example.com/{code}"),
            created_at: now - SignedDuration::from_secs(age),
        };
        fixture.repo.insert(&id(code), link).await.unwrap();
    }
    fixture
        .repo
        .insert(&id("bobs"), new_link("bob", "https://bob.example"))
        .await
        .unwrap();

    fixture.repo.record_visit(&id("older"), visit(None)).await.unwrap();
    fixture.repo.record_visit(&id("older"), visit(None)).await.unwrap();
    fixture.repo.record_visit(&id("bobs"), visit(None)).await.unwrap();

    let links = fixture.repo.list_by_owner(&owner("alice")).await.unwrap();
    assert_eq!(links.len(), 2);
    assert_eq!(links[0].short_id, id("newer"));
    assert_eq!(links[0].visits.len(), 0);
    assert_eq!(links[1].short_id, id("older"));
    assert_eq!(links[1].click_count, 2);
    assert_eq!(links[1].visits.len(), 2);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn delete_cascades_visits_and_checks_owner() {
    let fixture = Fixture::start().await;
    fixture
        .repo
        .insert(&id("to-delete"), new_link("alice", "https://example.com"))
        .await
        .unwrap();
    fixture
        .repo
        .record_visit(&id("to-delete"), visit(None))
        .await
        .unwrap();

    assert!(!fixture
        .repo
        .delete(&id("to-delete"), &owner("bob"))
        .await
        .unwrap());
    assert!(fixture
        .repo
        .delete(&id("to-delete"), &owner("alice"))
        .await
        .unwrap());

    assert!(fixture.repo.get(&id("to-delete")).await.unwrap().is_none());
    assert!(!fixture.repo.exists(&id("to-delete")).await.unwrap());

    let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM link_visits")
        .fetch_one(fixture.repo.pool())
        .await
        .unwrap();
    assert_eq!(orphans, 0);
}
