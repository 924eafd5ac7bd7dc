use allva_core::PreferenceStore;
use allva_core::preferences::keys;
use tempfile::tempdir;

#[test]
fn values_survive_a_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("preferences.dat");

    let store = PreferenceStore::load(&path);
    store.set(keys::LAST_USER, "1001");
    store.set(keys::REMEMBER_SESSION, true);
    store.set("note", "a=b\nsecond line\\end");
    let device_id = store.device_id();

    let reloaded = PreferenceStore::load(&path);
    assert_eq!(reloaded.get_str(keys::LAST_USER, ""), "1001");
    assert!(reloaded.get(keys::REMEMBER_SESSION, false));
    assert_eq!(reloaded.get_str("note", ""), "a=b\nsecond line\\end");
    assert_eq!(reloaded.device_id(), device_id);
}

#[test]
fn hand_edited_file_is_read_leniently() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("preferences.dat");
    std::fs::write(
        &path,
        "last_user=1002\r\nno separator here\nremember_session=TRUE\n\n",
    )
    .unwrap();

    let store = PreferenceStore::load(&path);

    assert_eq!(store.get_str(keys::LAST_USER, ""), "1002");
    assert!(store.get(keys::REMEMBER_SESSION, false));
    assert_eq!(store.entries().len(), 2);
}

#[test]
fn remove_all_drops_only_the_named_keys() {
    let store = PreferenceStore::in_memory();
    store.set(keys::LAST_USER, "1001");
    store.set(keys::LAST_OFFICE, "MAIN");
    let device_id = store.device_id();

    store.remove_all(&[keys::LAST_USER, keys::LAST_OFFICE]);

    assert!(!store.contains_key(keys::LAST_USER));
    assert!(!store.contains_key(keys::LAST_OFFICE));
    assert_eq!(store.get_str(keys::DEVICE_UUID, ""), device_id);
}
