//! Repository integration tests

use pretty_assertions::assert_eq;
use songbook_core::{LocationRepository, SongRepository, UserRepository};
use songbook_storage::{SqliteLocationRepository, SqliteSongRepository, SqliteUserRepository};
use tests::{db::TestDatabase, fixtures};

#[tokio::test]
async fn test_user_repository_create_and_get() {
    let (db, _dir) = TestDatabase::new().into_shared();
    let repo = SqliteUserRepository::new(db);

    let created = repo
        .create(&fixtures::test_user("Singer@Example.com"))
        .await
        .expect("Failed to create user");
    assert_eq!(created.email, "singer@example.com");
    assert!(created.active);
    assert!(!created.is_admin);

    let by_id = repo.get(created.id).await.unwrap().expect("user by id");
    assert_eq!(by_id.email, created.email);

    let by_email = repo
        .get_by_email("SINGER@example.com")
        .await
        .unwrap()
        .expect("user by email");
    assert_eq!(by_email.id, created.id);

    assert!(repo.get(created.id + 100).await.unwrap().is_none());
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_user_email_is_unique() {
    let (db, _dir) = TestDatabase::in_memory().into_shared();
    let repo = SqliteUserRepository::new(db);

    repo.create(&fixtures::test_user("dup@example.com"))
        .await
        .unwrap();
    assert!(repo
        .create(&fixtures::test_user("DUP@example.com"))
        .await
        .is_err());
}

#[tokio::test]
async fn test_song_repository_pages_newest_first() {
    let (db, _dir) = TestDatabase::in_memory().into_shared();
    let users = SqliteUserRepository::new(db.clone());
    let songs = SqliteSongRepository::new(db);

    let user = users
        .create(&fixtures::test_user("a@example.com"))
        .await
        .unwrap();
    let stored = songs
        .insert_many(user.id, &fixtures::numbered_songs(25))
        .await
        .unwrap();
    assert_eq!(stored, 25);
    assert_eq!(songs.count().await.unwrap(), 25);

    let first = songs.list_page(1, 10).await.unwrap();
    let titles: Vec<_> = first.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles.len(), 10);
    assert_eq!(titles[0], "Song 25");

    let last = songs.list_page(3, 10).await.unwrap();
    assert_eq!(last.len(), 5);
    assert_eq!(last[4].title, "Song 1");
    assert_eq!(last[4].year, Some(2000));

    assert!(songs.list_page(4, 10).await.unwrap().is_empty());
    assert_eq!(songs.list_for_user(user.id).await.unwrap().len(), 25);
}

#[tokio::test]
async fn test_location_repository_round_trip() {
    let (db, _dir) = TestDatabase::in_memory().into_shared();
    let users = SqliteUserRepository::new(db.clone());
    let locations = SqliteLocationRepository::new(db);

    let user = users
        .create(&fixtures::test_user("map@example.com"))
        .await
        .unwrap();
    locations
        .insert_many(
            user.id,
            &[
                fixtures::test_location("Oslo"),
                fixtures::test_location("Bergen"),
            ],
        )
        .await
        .unwrap();

    let listed = locations.list().await.unwrap();
    let titles: Vec<_> = listed.iter().map(|l| l.title.as_str()).collect();
    assert_eq!(titles, vec!["Bergen", "Oslo"]);
    assert_eq!(listed[0].population, Some(1_000));
    assert_eq!(listed[0].user_id, user.id);
}
