use super::*;

fn temp_root(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("vtstyle_manager_{name}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_png(path: &Path, rgba: [u8; 4], w: u32, h: u32) {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    img.save(path).unwrap();
}

#[test]
fn normalize_rel_path_rules() {
    assert_eq!(normalize_rel_path("a/./b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("../up.png").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn store_is_insert_if_absent() {
    let mgr = FileBitmapManager::new(temp_root("store"));
    let first = Arc::new(Bitmap::new(1, 1, vec![1, 2, 3, 255]).unwrap());
    let second = Arc::new(Bitmap::new(1, 1, vec![9, 9, 9, 255]).unwrap());

    assert!(mgr.get_bitmap("k").is_none());
    mgr.store_bitmap("k", first.clone());
    mgr.store_bitmap("k", second);
    assert!(Arc::ptr_eq(&mgr.get_bitmap("k").unwrap(), &first));
    assert_eq!(mgr.len(), 1);
}

#[test]
fn load_bitmap_decodes_and_caches_by_normalized_path() {
    let root = temp_root("load");
    std::fs::create_dir_all(root.join("icons")).unwrap();
    write_png(&root.join("icons/pin.png"), [0, 0, 255, 255], 4, 2);

    let mgr = FileBitmapManager::new(&root);
    let a = mgr.load_bitmap("icons/pin.png").unwrap();
    assert_eq!((a.width, a.height), (4, 2));
    assert_eq!(a.pixel(0, 0), Some([0, 0, 255, 255]));

    let b = mgr.load_bitmap("./icons//pin.png").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert!(mgr.get_bitmap("icons/pin.png").is_some());
}

#[test]
fn missing_file_is_asset_error() {
    let mgr = FileBitmapManager::new(temp_root("missing"));
    let err = mgr.load_bitmap("nope.png").unwrap_err();
    assert!(matches!(err, StyleError::Asset(_)));
    assert!(mgr.is_empty());
}
