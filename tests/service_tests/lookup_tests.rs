//! LookupService Tests
//!
//! Tests verify:
//! - Found / NotFound resolution and fallback targets
//! - Reads observe commits from an independent writer
//! - Cached and uncached modes agree

use std::fs::{self, File};

use redirect_engine::lookup::request_key;
use redirect_engine::storage::{Workbook, REDIRECT_SHEET};
use redirect_engine::{AdminService, Config, LookupService, RedirectError, Resolution, Selector};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn config_for(temp: &TempDir, cache: bool) -> Config {
    Config::builder()
        .store_path(temp.path().join("RedirectLibrary.rdlb"))
        .fallback_url("https://fallback.example/404")
        .lookup_cache(cache)
        .build()
}

fn both_modes() -> Vec<(TempDir, Config)> {
    [true, false]
        .into_iter()
        .map(|cache| {
            let temp = TempDir::new().unwrap();
            let config = config_for(&temp, cache);
            (temp, config)
        })
        .collect()
}

// =============================================================================
// Resolution Tests
// =============================================================================

#[test]
fn test_resolve_on_fresh_store_is_not_found() {
    for (_temp, config) in both_modes() {
        let lookup = LookupService::new(&config);
        assert_eq!(lookup.resolve("a.com/x").unwrap(), Resolution::NotFound);
        assert!(config.store_path.exists());
    }
}

#[test]
fn test_resolve_found() {
    for (_temp, config) in both_modes() {
        let admin = AdminService::new(&config);
        admin.add("a.com/x", "https://b.com").unwrap();

        let lookup = LookupService::new(&config);
        assert_eq!(
            lookup.resolve("a.com/x").unwrap(),
            Resolution::Found("https://b.com".to_string())
        );
        assert_eq!(lookup.resolve("a.com/X").unwrap(), Resolution::NotFound);
    }
}

#[test]
fn test_redirect_target_uses_fallback() {
    for (_temp, config) in both_modes() {
        let admin = AdminService::new(&config);
        admin.add("a.com/x", "https://b.com").unwrap();

        let lookup = LookupService::new(&config);
        assert_eq!(lookup.redirect_target("a.com", "/x").unwrap(), "https://b.com");
        assert_eq!(
            lookup.redirect_target("a.com", "/missing").unwrap(),
            "https://fallback.example/404"
        );
    }
}

#[test]
fn test_request_key_is_plain_concatenation() {
    assert_eq!(request_key("a.com", "/x"), "a.com/x");
    assert_eq!(request_key("A.com", "/x/"), "A.com/x/");
    assert_eq!(request_key("", ""), "");
}

// =============================================================================
// Freshness Tests
// =============================================================================

#[test]
fn test_lookup_sees_every_returned_commit() {
    for (_temp, config) in both_modes() {
        let admin = AdminService::new(&config);
        let lookup = LookupService::new(&config);

        admin.add("a.com/x", "https://v1").unwrap();
        assert_eq!(
            lookup.resolve("a.com/x").unwrap(),
            Resolution::Found("https://v1".to_string())
        );

        admin
            .update(&Selector::Position(0), "a.com/x", "https://v2")
            .unwrap();
        assert_eq!(
            lookup.resolve("a.com/x").unwrap(),
            Resolution::Found("https://v2".to_string())
        );

        admin.delete(&Selector::Position(0)).unwrap();
        assert_eq!(lookup.resolve("a.com/x").unwrap(), Resolution::NotFound);
    }
}

#[test]
fn test_cache_refreshes_after_same_length_rewrite() {
    let temp = TempDir::new().unwrap();
    let config = config_for(&temp, true);
    let admin = AdminService::new(&config);
    let lookup = LookupService::new(&config);

    admin.add("a.com/x", "https://1").unwrap();
    assert_eq!(
        lookup.resolve("a.com/x").unwrap(),
        Resolution::Found("https://1".to_string())
    );

    // Same inode, same length, mtime restored: only the contents change.
    let mtime = fs::metadata(&config.store_path).unwrap().modified().unwrap();
    let mut wb = Workbook::read_from(&config.store_path).unwrap().unwrap();
    wb.sheet_mut(REDIRECT_SHEET).unwrap().rows[0][1] = "https://2".to_string();
    fs::write(&config.store_path, wb.encode().unwrap()).unwrap();
    File::options()
        .write(true)
        .open(&config.store_path)
        .unwrap()
        .set_modified(mtime)
        .unwrap();

    assert_eq!(
        lookup.resolve("a.com/x").unwrap(),
        Resolution::Found("https://2".to_string())
    );
}

#[test]
fn test_rejected_mutation_is_never_observed() {
    for (_temp, config) in both_modes() {
        let admin = AdminService::new(&config);
        let lookup = LookupService::new(&config);
        admin.add("a.com/x", "https://a").unwrap();
        admin.add("b.com/x", "https://b").unwrap();

        assert!(admin
            .update(&Selector::Position(0), "b.com/x", "https://clobber")
            .is_err());

        assert_eq!(
            lookup.resolve("a.com/x").unwrap(),
            Resolution::Found("https://a".to_string())
        );
        assert_eq!(
            lookup.resolve("b.com/x").unwrap(),
            Resolution::Found("https://b".to_string())
        );
    }
}

#[test]
fn test_corrupt_store_surfaces_error() {
    for (_temp, config) in both_modes() {
        std::fs::write(&config.store_path, b"not a store").unwrap();
        let lookup = LookupService::new(&config);
        assert!(matches!(
            lookup.resolve("a.com/x"),
            Err(RedirectError::StoreCorrupt(_))
        ));
    }
}
