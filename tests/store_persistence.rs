// tests/store_persistence.rs
//
// The selection must survive a process restart; we simulate one by
// dropping the store and reopening the same path.

use purplewatch::provider::SensorId;
use purplewatch::store::SensorStore;

#[test]
fn selection_survives_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("selection.json");

    {
        let store = SensorStore::new(&path);
        store.set_selected(Some(SensorId(25999))).expect("set");
    }

    let reopened = SensorStore::new(&path);
    assert_eq!(reopened.selected(), Some(SensorId(25999)));
}

#[test]
fn cleared_selection_survives_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("selection.json");

    {
        let store = SensorStore::new(&path);
        store.set_selected(Some(SensorId(7))).expect("set");
        store.set_selected(None).expect("clear");
    }

    let reopened = SensorStore::new(&path);
    assert_eq!(reopened.selected(), None);
}

#[test]
fn store_creates_missing_parent_dirs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested/data/selection.json");

    let store = SensorStore::new(&path);
    store.set_selected(Some(SensorId(1))).expect("set");
    assert_eq!(store.selected(), Some(SensorId(1)));
}
