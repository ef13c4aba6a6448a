//! Shared fixtures for the server integration tests.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use catalog::CatalogIndex;
use tempfile::TempDir;
use tower::ServiceExt;

/// Small catalog on disk:
/// - Horror 5, 6, 7, 9 (ranks 90, 80, 70, 5)
/// - Drama 10 (60), 11 (95); Comedy 20 (40), 21 (85); Sci-Fi 30 (75)
/// - u1 interacted with 10 and 20, u3 with 10 and 30
/// - u2 saved film 9 (Horror)
const FILMS: &str = "\
# id::title::category::year::minutes::age::rank::image::trailer::overview
5::The Ring::Horror::2002::115::15::90::ring.jpg::ring.mp4::A cursed videotape.
6::Hereditary::Horror::2018::127::18::80::hereditary.jpg::hereditary.mp4::Grief turns sinister.
7::It Follows::Horror::2014::100::18::70::follows.jpg::follows.mp4::Something walks behind you.
9::Troll Hunter::Horror::2010::103::15::5::troll.jpg::troll.mp4::Found footage :: in Norway.
10::Parasite::Drama::2019::132::15::60::parasite.jpg::parasite.mp4::Two families.
11::Aftersun::Drama::2022::102::12::95::aftersun.jpg::aftersun.mp4::A holiday remembered.
20::Paddington 2::Comedy::2017::103::0::40::paddington.jpg::paddington.mp4::Marmalade.
21::The Nice Guys::Comedy::2016::116::15::85::niceguys.jpg::niceguys.mp4::Two detectives.
30::Arrival::Sci-Fi::2016::116::12::75::arrival.jpg::arrival.mp4::First contact.
";

const INTERACTIONS: &str = "\
u1::10::1700000000
u1::20::1700000100
u3::10::1700000200
u3::30::1700000300
";

const WATCHLISTS: &str = "\
u2::9
";

/// Global top films by rank, capped at eight
pub const TOP_RANKED: [u32; 8] = [11, 5, 21, 6, 30, 7, 10, 20];

pub fn write_catalog(dir: &Path) {
    fs::write(dir.join("films.dat"), FILMS).unwrap();
    fs::write(dir.join("interactions.dat"), INTERACTIONS).unwrap();
    fs::write(dir.join("watchlists.dat"), WATCHLISTS).unwrap();
}

/// Load the fixture catalog through the real parser
pub fn load_catalog() -> (TempDir, Arc<CatalogIndex>) {
    let dir = tempfile::tempdir().unwrap();
    write_catalog(dir.path());
    let index = CatalogIndex::load_from_files(dir.path()).unwrap();
    (dir, Arc::new(index))
}

pub async fn get(app: axum::Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn film_ids(json: &serde_json::Value) -> Vec<u32> {
    json.as_array()
        .unwrap()
        .iter()
        .map(|f| f["id"].as_u64().unwrap() as u32)
        .collect()
}
