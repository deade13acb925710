use super::*;

fn id(s: &str) -> PostId {
    PostId::parse(s).unwrap()
}

fn exercise(store: &dyn ArtifactStore) {
    let post = id("post-1");
    assert_eq!(store.get(&post).unwrap(), None);

    store.put(&post, &CardMarkup::new("<svg>1</svg>")).unwrap();
    assert_eq!(store.get(&post).unwrap(), Some(CardMarkup::new("<svg>1</svg>")));

    store.put(&post, &CardMarkup::new("<svg>2</svg>")).unwrap();
    assert_eq!(store.get(&post).unwrap(), Some(CardMarkup::new("<svg>2</svg>")));

    assert!(store.remove(&post).unwrap());
    assert!(!store.remove(&post).unwrap());
    assert_eq!(store.get(&post).unwrap(), None);
}

#[test]
fn memory_store_put_get_remove() {
    let store = MemoryArtifactStore::new();
    exercise(&store);
    assert!(store.is_empty());
}

#[test]
fn fs_store_put_get_remove() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsArtifactStore::open(dir.path().join("cards")).unwrap();
    exercise(&store);
}

#[test]
fn fs_store_writes_one_file_per_post_and_no_temp_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsArtifactStore::open(dir.path()).unwrap();
    store.put(&id("a"), &CardMarkup::new("<svg/>")).unwrap();
    store.put(&id("b"), &CardMarkup::new("<svg/>")).unwrap();

    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["a.svg".to_string(), "b.svg".to_string()]);
    assert_eq!(store.artifact_path(&id("a")), dir.path().join("a.svg"));
}

#[test]
fn fs_store_overlapping_puts_for_one_post_all_succeed() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsArtifactStore::open(dir.path()).unwrap();
    let post = id("dup");
    let bodies: Vec<CardMarkup> = (b'a'..=b'd')
        .map(|c| {
            let fill = String::from_utf8(vec![c; 1 << 20]).unwrap();
            CardMarkup::new(format!("<svg>{fill}</svg>"))
        })
        .collect();

    let (store, post) = (&store, &post);
    for _ in 0..10 {
        std::thread::scope(|s| {
            let handles: Vec<_> = bodies
                .iter()
                .map(|body| s.spawn(move || store.put(post, body)))
                .collect();
            for h in handles {
                h.join().unwrap().unwrap();
            }
        });
        let stored = store.get(post).unwrap().unwrap();
        assert!(bodies.contains(&stored));
    }

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["dup.svg".to_string()]);
}

#[test]
fn memory_store_len_survives_poisoned_lock() {
    let store = MemoryArtifactStore::new();
    store.put(&id("p1"), &CardMarkup::new("<svg/>")).unwrap();
    let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _guard = store.inner.write().unwrap();
        panic!("poison the lock");
    }));
    assert!(store.inner.is_poisoned());
    assert_eq!(store.len(), 1);
    assert!(store.get(&id("p1")).is_err());
}

#[test]
fn catalog_lookup() {
    let catalog = MemoryPostCatalog::new().with(id("p1"), PostEntry::default());
    assert_eq!(catalog.lookup(&id("p1")).unwrap(), Some(PostEntry::default()));
    assert_eq!(catalog.lookup(&id("p2")).unwrap(), None);
}
