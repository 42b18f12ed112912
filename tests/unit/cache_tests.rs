/*!
 * Tests for translation cache functionality
 */

use ppt_translator::translation::cache::{normalize_text, CacheKey, TranslationCache};

fn key(text: &str, source: &str, target: &str) -> CacheKey {
    CacheKey::new(text, source, target, "mock", "mock-model")
}

#[test]
fn test_cache_new_withDisabled_shouldNeverHit() {
    let cache = TranslationCache::new(false);
    cache.store(key("hello", "en", "fr"), "bonjour");

    assert!(cache.lookup(&key("hello", "en", "fr")).is_none());
    assert!(cache.is_empty());
}

#[test]
fn test_cache_store_withEnabledCache_shouldStoreTranslation() {
    let cache = TranslationCache::new(true);
    cache.store(key("hello", "en", "fr"), "bonjour");

    assert_eq!(cache.lookup(&key("hello", "en", "fr")), Some("bonjour".to_string()));
}

#[test]
fn test_cache_lookup_withDifferentLanguages_shouldMiss() {
    let cache = TranslationCache::new(true);
    cache.store(key("hello", "en", "fr"), "bonjour");

    assert!(cache.lookup(&key("hello", "de", "fr")).is_none());
    assert!(cache.lookup(&key("hello", "en", "es")).is_none());
}

#[test]
fn test_cache_lookup_withDifferentModel_shouldMiss() {
    let cache = TranslationCache::new(true);
    cache.store(key("hello", "en", "fr"), "bonjour");

    let other_model = CacheKey::new("hello", "en", "fr", "mock", "other-model");
    let other_provider = CacheKey::new("hello", "en", "fr", "openai", "mock-model");
    assert!(cache.lookup(&other_model).is_none());
    assert!(cache.lookup(&other_provider).is_none());
}

#[test]
fn test_cache_store_withSameKey_shouldOverwrite() {
    let cache = TranslationCache::new(true);
    cache.store(key("hello", "en", "fr"), "bonjour");
    cache.store(key("hello", "en", "fr"), "salut");

    assert_eq!(cache.lookup(&key("hello", "en", "fr")), Some("salut".to_string()));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_cacheKey_withWhitespaceVariants_shouldBeEqual() {
    assert_eq!(key("  Hello \n  world ", "EN", "fr"), key("Hello world", "en", "FR"));
    assert_eq!(normalize_text("\tA\t\tB  "), "A B");
}

#[test]
fn test_cache_stats_shouldCountHitsAndMisses() {
    let cache = TranslationCache::new(true);
    cache.store(key("hello", "en", "fr"), "bonjour");

    cache.lookup(&key("hello", "en", "fr"));
    cache.lookup(&key("bye", "en", "fr"));

    let (hits, misses, rate) = cache.stats();
    assert_eq!(hits, 1);
    assert_eq!(misses, 1);
    assert!((rate - 0.5).abs() < f64::EPSILON);

    cache.clear();
    assert_eq!(cache.stats().0, 0);
    assert!(cache.is_empty());
}

#[test]
fn test_cache_clone_shouldShareEntries() {
    let cache = TranslationCache::default();
    let clone = cache.clone();
    clone.store(key("test", "en", "fr"), "essai");

    assert_eq!(cache.lookup(&key("test", "en", "fr")), Some("essai".to_string()));
    assert!(!cache.is_persistent());
}

#[test]
fn test_cache_sharedAcrossThreads_shouldKeepEveryEntry() {
    let cache = TranslationCache::new(true);

    let workers: Vec<_> = (0..8)
        .map(|worker| {
            let cache = cache.clone();
            std::thread::spawn(move || {
                for i in 0..200 {
                    let text = format!("text {}", (i + worker) % 20);
                    cache.store(key(&text, "en", "fr"), &format!("{} fr", text));
                    let found = cache.lookup(&key(&text, "en", "fr"));
                    assert_eq!(found, Some(format!("{} fr", text)));
                    cache.lookup(&key(&format!("text {}", (i * 7) % 20), "en", "fr"));
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(cache.len(), 20);
    for i in 0..20 {
        let text = format!("text {}", i);
        assert_eq!(cache.lookup(&key(&text, "en", "fr")), Some(format!("{} fr", text)));
    }
    let (hits, misses, _) = cache.stats();
    assert_eq!(hits + misses, 8 * 200 * 2 + 20);
}
