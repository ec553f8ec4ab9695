#![cfg(feature = "remote")]

use std::time::Duration;

use serde_json::json;

use vocab_lookup::error::{Result, VocabError};
use vocab_lookup::lookup::engine::VocabularyLookup;
use vocab_lookup::lookup::resolver::MatchKind;

fn serve_life_stage(server: &mut mockito::ServerGuard) -> (mockito::Mock, mockito::Mock) {
    let release = json!({
        "key": 12,
        "vocabularyKey": 4,
        "version": "2.1",
        "exportUrl": format!("{}/exports/LifeStage-2.1.json", server.url())
    });
    let export = json!({
        "metadata": { "createdDate": "2024-03-01T10:00:00Z" },
        "vocabulary": { "name": "LifeStage" },
        "concepts": [
            { "key": 1, "name": "Adult", "label": { "es": "adulto" } },
            { "key": 2, "name": "Imago", "parentKey": 1, "hiddenLabels": ["subimago"] }
        ]
    });

    let release_mock = server
        .mock("GET", "/vocabularies/LifeStage/releases/latest")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(release.to_string())
        .create();
    let export_mock = server
        .mock("GET", "/exports/LifeStage-2.1.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(export.to_string())
        .create();
    (release_mock, export_mock)
}

#[test]
fn load_latest_release_from_api() -> Result<()> {
    let mut server = mockito::Server::new();
    let (release, export) = serve_life_stage(&mut server);

    let lookup = VocabularyLookup::load_from_api(server.url(), "LifeStage")?;
    release.assert();
    export.assert();

    assert_eq!(lookup.vocabulary().unwrap().name, "LifeStage");
    assert_eq!(lookup.lookup("adulto", None).unwrap().key(), 1);

    let result = lookup.lookup("SubImago", None).unwrap();
    assert_eq!(result.matched_by(), MatchKind::HiddenLabel);
    assert_eq!(result.ancestor_names(), vec!["Adult"]);
    Ok(())
}

#[test]
fn builder_downloads_with_timeout() -> Result<()> {
    let mut server = mockito::Server::new();
    let _mocks = serve_life_stage(&mut server);

    let lookup = VocabularyLookup::builder()
        .from_api(format!("{}/", server.url()), "LifeStage")
        .with_timeout(Duration::from_secs(2))
        .build()?;
    assert_eq!(lookup.len(), 2);
    Ok(())
}

#[test]
fn unknown_vocabulary_fails_the_load() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/vocabularies/Missing/releases/latest")
        .with_status(404)
        .create();

    assert!(matches!(
        VocabularyLookup::load_from_api(server.url(), "Missing"),
        Err(VocabError::Remote(_))
    ));
}

#[test]
fn failed_export_download_fails_the_load() {
    let mut server = mockito::Server::new();
    let release = json!({ "exportUrl": format!("{}/exports/broken.json", server.url()) });
    server
        .mock("GET", "/vocabularies/LifeStage/releases/latest")
        .with_status(200)
        .with_body(release.to_string())
        .create();
    server
        .mock("GET", "/exports/broken.json")
        .with_status(500)
        .create();

    assert!(matches!(
        VocabularyLookup::load_from_api(server.url(), "LifeStage"),
        Err(VocabError::Remote(_))
    ));
}
