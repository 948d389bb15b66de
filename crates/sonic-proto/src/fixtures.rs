//! Built-in demo data: the starter collections and the track list the
//! fixture search provider filters over.

use crate::protocol::{Collection, Track};

fn track(id: &str, title: &str, artist: &str, cover: &str, youtube_id: &str) -> Track {
    Track {
        id: id.to_string(),
        title: title.to_string(),
        artist: artist.to_string(),
        album_cover_url: cover.to_string(),
        youtube_id: Some(youtube_id.to_string()),
        audio_url: None,
    }
}

pub fn blues_with_a_feelin() -> Track {
    track(
        "101",
        "Blues with a Feelin'",
        "Little Walter",
        "https://upload.wikimedia.org/wikipedia/en/1/1f/Little_Walter_Blues_with_a_Feeling.jpg",
        "9j8C9jTCps4",
    )
}

pub fn the_thrill_is_gone() -> Track {
    track(
        "201",
        "The Thrill Is Gone",
        "BB King",
        "https://upload.wikimedia.org/wikipedia/en/e/ec/B.B._King_-_Live_in_Cook_County_Jail.jpg",
        "oica5jG7FpU",
    )
}

pub fn sweet_home_chicago() -> Track {
    track(
        "202",
        "Sweet Home Chicago",
        "Robert Johnson",
        "https://upload.wikimedia.org/wikipedia/en/a/a6/Cross_Road_Blues.jpg",
        "dkftesK2dck",
    )
}

pub fn initial_collections() -> Vec<Collection> {
    vec![
        Collection {
            id: "1".to_string(),
            name: "Blues Classics".to_string(),
            tracks: vec![blues_with_a_feelin()],
        },
        Collection {
            id: "2".to_string(),
            name: "Rock Favorites".to_string(),
            tracks: Vec::new(),
        },
    ]
}

pub fn search_tracks() -> Vec<Track> {
    vec![the_thrill_is_gone(), sweet_home_chicago()]
}
