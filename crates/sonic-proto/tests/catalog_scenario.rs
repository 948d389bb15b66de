//! End-to-end walk through the catalog the way the view layer drives it.

use sonic_proto::catalog::CatalogStore;
use sonic_proto::fixtures;
use sonic_proto::protocol::Collection;
use sonic_proto::state::StateManager;

fn track_ids(collection: &Collection) -> Vec<&str> {
    collection.tracks.iter().map(|t| t.id.as_str()).collect()
}

#[test]
fn blues_classics_add_then_remove() {
    let mut store = CatalogStore::with_collections(vec![Collection {
        id: "1".to_string(),
        name: "Blues Classics".to_string(),
        tracks: vec![fixtures::blues_with_a_feelin()],
    }]);

    assert!(store.add_track("1", fixtures::the_thrill_is_gone()));
    assert_eq!(track_ids(store.collection("1").unwrap()), vec!["101", "201"]);

    assert!(store.remove_track("1", "101"));
    assert_eq!(track_ids(store.collection("1").unwrap()), vec!["201"]);
}

#[test]
fn double_add_keeps_single_copy_last() {
    let mut store = CatalogStore::with_collections(fixtures::initial_collections());
    let thrill = fixtures::the_thrill_is_gone();

    store.add_track("1", thrill.clone());
    store.add_track("1", fixtures::sweet_home_chicago());
    store.add_track("1", thrill.clone());

    let collection = store.collection("1").unwrap();
    assert_eq!(
        collection.tracks.iter().filter(|t| t.id == thrill.id).count(),
        1
    );
    assert_eq!(collection.tracks.last().unwrap().id, thrill.id);
}

#[test]
fn blank_names_never_create_collections() {
    let mut store = CatalogStore::with_collections(fixtures::initial_collections());
    let before = store.len();
    assert!(store.create_collection("").is_err());
    assert!(store.create_collection("   ").is_err());
    assert!(store.create_collection("\t\n").is_err());
    assert_eq!(store.len(), before);
}

#[tokio::test]
async fn snapshot_reflects_catalog_and_session() {
    let manager = StateManager::new(fixtures::initial_collections());
    let created = manager.create_collection("Road Trip").await.unwrap();
    manager.set_search_results(fixtures::search_tracks()).await;
    manager.select_result("201").await.unwrap();
    manager.set_playing(true).await;

    let snapshot = manager.get_state().await;
    assert_eq!(snapshot.collections.len(), 3);
    assert_eq!(snapshot.collections[2].id, created.id);
    assert_eq!(snapshot.session.last_search_results.len(), 2);
    assert_eq!(
        snapshot.session.selected_track.as_ref().map(|t| t.id.as_str()),
        Some("201")
    );
    assert!(snapshot.session.is_playing);

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["session"]["isPlaying"], true);
    assert_eq!(
        json["session"]["selectedTrack"]["albumCoverUrl"],
        fixtures::the_thrill_is_gone().album_cover_url
    );
}
