use folio_core::db::open_db_in_memory;
use folio_core::{
    AdminToken, FsMediaStore, GalleryError, GalleryService, MediaFile, MediaStore, ProjectDraft,
    ProjectId, Slug, SqliteProjectRepository, SweepMode, ValidationError,
};
use rusqlite::Connection;
use std::fs;
use std::path::Path;

fn admin() -> AdminToken {
    AdminToken::issue("owner").unwrap()
}

fn service<'conn>(
    conn: &'conn Connection,
    media_dir: &Path,
) -> GalleryService<SqliteProjectRepository<'conn>, FsMediaStore> {
    GalleryService::new(
        SqliteProjectRepository::new(conn),
        FsMediaStore::new(media_dir),
    )
}

fn images(names: &[&str]) -> Vec<MediaFile> {
    names
        .iter()
        .map(|name| MediaFile::new(*name, name.as_bytes().to_vec()))
        .collect()
}

fn draft(title: &str, files: &[&str]) -> ProjectDraft {
    ProjectDraft {
        files: images(files),
        ..ProjectDraft::new(title)
    }
}

fn row_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM projects;", [], |row| row.get(0))
        .unwrap()
}

fn dir_is_empty(path: &Path) -> bool {
    !path.exists() || fs::read_dir(path).unwrap().next().is_none()
}

#[test]
fn empty_title_fails_without_creating_directory() {
    let conn = open_db_in_memory().unwrap();
    let media = tempfile::tempdir().unwrap();
    let gallery = service(&conn, media.path());

    let err = gallery
        .publish(&admin(), draft("", &["a.png"]))
        .unwrap_err();

    assert!(matches!(
        err,
        GalleryError::Validation(ValidationError::MissingTitle)
    ));
    assert!(dir_is_empty(media.path()));
    assert_eq!(row_count(&conn), 0);
}

#[test]
fn eleven_images_fail_without_directory_or_row() {
    let conn = open_db_in_memory().unwrap();
    let media = tempfile::tempdir().unwrap();
    let gallery = service(&conn, media.path());

    let names: Vec<String> = (0..11).map(|i| format!("img{i:02}.png")).collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let err = gallery
        .publish(&admin(), draft("Too Many", &name_refs))
        .unwrap_err();

    assert!(matches!(
        err,
        GalleryError::Validation(ValidationError::TooManyFiles { count: 11, max: 10 })
    ));
    assert!(dir_is_empty(media.path()));
    assert_eq!(row_count(&conn), 0);
}

#[test]
fn ten_images_are_accepted() {
    let conn = open_db_in_memory().unwrap();
    let media = tempfile::tempdir().unwrap();
    let gallery = service(&conn, media.path());

    let names: Vec<String> = (0..10).map(|i| format!("img{i:02}.png")).collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let id = gallery
        .publish(&admin(), draft("Full House", &name_refs))
        .unwrap();

    assert_eq!(gallery.view(id).unwrap().images, names);
}

#[test]
fn colliding_slug_is_rejected_and_first_project_is_untouched() {
    let conn = open_db_in_memory().unwrap();
    let media = tempfile::tempdir().unwrap();
    let gallery = service(&conn, media.path());

    let first = gallery
        .publish(&admin(), draft("My Project", &["one.png"]))
        .unwrap();
    let err = gallery
        .publish(&admin(), draft("my project", &["two.png"]))
        .unwrap_err();

    assert!(matches!(err, GalleryError::Collision(ref slug) if slug.as_str() == "my_project"));
    assert_eq!(row_count(&conn), 1);

    let view = gallery.view(first).unwrap();
    assert_eq!(view.project.title, "My Project");
    assert_eq!(view.images, vec!["one.png"]);
    assert_eq!(
        fs::read(media.path().join("my_project").join("one.png")).unwrap(),
        b"one.png"
    );
}

#[test]
fn view_lists_images_in_lexicographic_order() {
    let conn = open_db_in_memory().unwrap();
    let media = tempfile::tempdir().unwrap();
    let gallery = service(&conn, media.path());

    let request = ProjectDraft {
        subtitle: Some(String::new()),
        description: Some("<p>x</p>".to_string()),
        link: Some(String::new()),
        ..draft("Alpha", &["imgB.png", "imgA.png"])
    };
    let id = gallery.publish(&admin(), request).unwrap();

    let view = gallery.view(id).unwrap();
    assert_eq!(view.project.title, "Alpha");
    assert_eq!(view.images, vec!["imgA.png", "imgB.png"]);
    assert!(!view.media_missing);
    assert!(media.path().join("alpha").is_dir());
}

#[test]
fn publish_then_view_roundtrips_every_field() {
    let conn = open_db_in_memory().unwrap();
    let media = tempfile::tempdir().unwrap();
    let gallery = service(&conn, media.path());

    let request = ProjectDraft {
        subtitle: Some("Art Direction".to_string()),
        description: Some("<h2>Case study</h2><ul><li>Brand</li></ul>".to_string()),
        link: Some("https://studio.example/case".to_string()),
        ..draft("Studio  Rebrand", &["z.jpg", "m.jpeg", "a.png"])
    };
    let id = gallery.publish(&admin(), request.clone()).unwrap();

    let view = gallery.view(id).unwrap();
    assert_eq!(view.project.id, id);
    assert_eq!(view.project.title, request.title);
    assert_eq!(view.project.subtitle, request.subtitle);
    assert_eq!(view.project.description, request.description);
    assert_eq!(view.project.link, request.link);
    assert_eq!(view.project.folder.unwrap().as_str(), "studio_rebrand");

    let mut uploaded: Vec<String> = request.files.iter().map(|f| f.name.clone()).collect();
    uploaded.sort();
    assert_eq!(view.images, uploaded);
}

#[test]
fn project_without_images_has_no_folder() {
    let conn = open_db_in_memory().unwrap();
    let media = tempfile::tempdir().unwrap();
    let gallery = service(&conn, media.path());

    let id = gallery.publish(&admin(), draft("Text Only", &[])).unwrap();

    let view = gallery.view(id).unwrap();
    assert_eq!(view.project.folder, None);
    assert!(view.images.is_empty());
    assert!(!view.media_missing);
    assert!(!media.path().join("text_only").exists());
}

#[test]
fn invalid_file_name_fails_before_any_write() {
    let conn = open_db_in_memory().unwrap();
    let media = tempfile::tempdir().unwrap();
    let gallery = service(&conn, media.path());

    let err = gallery
        .publish(&admin(), draft("Sneaky", &["fine.png", "../../etc.png"]))
        .unwrap_err();

    assert!(matches!(
        err,
        GalleryError::Validation(ValidationError::InvalidFileName(_))
    ));
    assert!(dir_is_empty(media.path()));
    assert_eq!(row_count(&conn), 0);
}

#[test]
fn non_image_uploads_fail_before_any_write() {
    let conn = open_db_in_memory().unwrap();
    let media = tempfile::tempdir().unwrap();
    let gallery = service(&conn, media.path());

    let err = gallery
        .publish(&admin(), draft("Beta", &["payload.exe", "notes.txt"]))
        .unwrap_err();

    assert!(matches!(
        err,
        GalleryError::Validation(ValidationError::UnsupportedImageType(ref name)) if name == "payload.exe"
    ));
    assert_eq!(err.code(), "validation");
    assert!(dir_is_empty(media.path()));
    assert_eq!(row_count(&conn), 0);
}

#[test]
fn image_extensions_match_case_insensitively() {
    let conn = open_db_in_memory().unwrap();
    let media = tempfile::tempdir().unwrap();
    let gallery = service(&conn, media.path());

    let id = gallery
        .publish(&admin(), draft("Mixed Case", &["Cover.PNG", "x.JPEG", "y.jpg"]))
        .unwrap();

    assert_eq!(
        gallery.view(id).unwrap().images,
        vec!["Cover.PNG", "x.JPEG", "y.jpg"]
    );
}

#[test]
fn overlong_title_is_a_validation_error_not_storage() {
    let conn = open_db_in_memory().unwrap();
    let media = tempfile::tempdir().unwrap();
    let gallery = service(&conn, media.path());

    let err = gallery
        .publish(&admin(), draft(&"a".repeat(300), &["a.png"]))
        .unwrap_err();

    assert!(matches!(
        err,
        GalleryError::Validation(ValidationError::InvalidSlug(_))
    ));
    assert!(dir_is_empty(media.path()));
    assert_eq!(row_count(&conn), 0);
}

#[test]
fn failed_row_insert_discards_saved_media() {
    let conn = open_db_in_memory().unwrap();
    let media = tempfile::tempdir().unwrap();
    let gallery = service(&conn, media.path());
    conn.execute_batch("DROP TABLE projects;").unwrap();

    let err = gallery
        .publish(&admin(), draft("Alpha", &["a.png"]))
        .unwrap_err();

    assert!(matches!(err, GalleryError::Storage(_)));
    assert_eq!(err.code(), "storage");
    assert!(!media.path().join("alpha").exists());
}

#[test]
fn remove_twice_fails_second_time_and_deletes_media() {
    let conn = open_db_in_memory().unwrap();
    let media = tempfile::tempdir().unwrap();
    let gallery = service(&conn, media.path());

    let id = gallery
        .publish(&admin(), draft("Short Lived", &["a.png"]))
        .unwrap();
    assert!(media.path().join("short_lived").is_dir());

    let removed = gallery.remove(&admin(), id).unwrap();
    assert_eq!(removed.project.id, id);
    assert!(removed.media_removed);
    assert!(!media.path().join("short_lived").exists());

    let err = gallery.remove(&admin(), id).unwrap_err();
    assert!(matches!(err, GalleryError::NotFound(missing) if missing == id));
}

#[test]
fn remove_unknown_id_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let media = tempfile::tempdir().unwrap();
    let gallery = service(&conn, media.path());

    let err = gallery
        .remove(&admin(), ProjectId::new(5).unwrap())
        .unwrap_err();
    assert!(matches!(err, GalleryError::NotFound(_)));
}

#[test]
fn removed_slug_can_be_published_again() {
    let conn = open_db_in_memory().unwrap();
    let media = tempfile::tempdir().unwrap();
    let gallery = service(&conn, media.path());

    let first = gallery.publish(&admin(), draft("Reuse", &["a.png"])).unwrap();
    gallery.remove(&admin(), first).unwrap();

    let second = gallery.publish(&admin(), draft("Reuse", &["b.png"])).unwrap();
    assert!(second > first);
    assert_eq!(gallery.view(second).unwrap().images, vec!["b.png"]);
}

#[test]
fn remove_keeps_folder_still_referenced_by_another_row() {
    let conn = open_db_in_memory().unwrap();
    let media = tempfile::tempdir().unwrap();
    let gallery = service(&conn, media.path());

    let first = gallery
        .publish(&admin(), draft("Shared", &["a.png"]))
        .unwrap();
    conn.execute(
        "INSERT INTO projects (header, folder_name) VALUES ('Shared Copy', 'shared');",
        [],
    )
    .unwrap();

    let removed = gallery.remove(&admin(), first).unwrap();
    assert!(!removed.media_removed);
    assert!(media.path().join("shared").is_dir());
}

#[test]
fn remove_succeeds_with_unparseable_legacy_row_present() {
    let conn = open_db_in_memory().unwrap();
    let media = tempfile::tempdir().unwrap();
    let gallery = service(&conn, media.path());

    let id = gallery
        .publish(&admin(), draft("Alpha", &["a.png"]))
        .unwrap();
    conn.execute(
        "INSERT INTO projects (header, folder_name) VALUES ('Legacy', '/abs/legacy');",
        [],
    )
    .unwrap();

    let removed = gallery.remove(&admin(), id).unwrap();
    assert!(removed.media_removed);
    assert!(!media.path().join("alpha").exists());
    assert_eq!(row_count(&conn), 1);
}

#[test]
fn view_all_is_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let media = tempfile::tempdir().unwrap();
    let gallery = service(&conn, media.path());

    let first = gallery.publish(&admin(), draft("First", &["1.png"])).unwrap();
    let second = gallery.publish(&admin(), draft("Second", &[])).unwrap();
    let third = gallery
        .publish(&admin(), draft("Third", &["3b.png", "3a.png"]))
        .unwrap();

    let views = gallery.view_all().unwrap();
    let ids: Vec<ProjectId> = views.iter().map(|view| view.project.id).collect();
    assert_eq!(ids, vec![third, second, first]);
    assert_eq!(views[0].images, vec!["3a.png", "3b.png"]);
    assert!(views[1].images.is_empty());
}

#[test]
fn missing_media_directory_is_a_warning_not_an_error() {
    let conn = open_db_in_memory().unwrap();
    let media = tempfile::tempdir().unwrap();
    let gallery = service(&conn, media.path());

    let id = gallery
        .publish(&admin(), draft("Fragile", &["a.png"]))
        .unwrap();
    fs::remove_dir_all(media.path().join("fragile")).unwrap();

    let view = gallery.view(id).unwrap();
    assert!(view.media_missing);
    assert!(view.images.is_empty());
    assert_eq!(gallery.integrity_report().unwrap(), vec![id]);
}

#[test]
fn sweep_reports_and_deletes_orphan_directories() {
    let conn = open_db_in_memory().unwrap();
    let media = tempfile::tempdir().unwrap();
    let gallery = service(&conn, media.path());

    gallery
        .publish(&admin(), draft("Kept", &["k.png"]))
        .unwrap();
    // Simulates a crash between media write and row insert.
    gallery
        .media()
        .save(&Slug::parse("crashed").unwrap(), &images(&["c.png"]))
        .unwrap();

    let dry = gallery.sweep_orphans(&admin(), SweepMode::DryRun).unwrap();
    assert_eq!(dry.orphans, vec![Slug::parse("crashed").unwrap()]);
    assert!(dry.removed.is_empty());
    assert!(media.path().join("crashed").is_dir());

    let swept = gallery.sweep_orphans(&admin(), SweepMode::Delete).unwrap();
    assert_eq!(swept.removed, vec![Slug::parse("crashed").unwrap()]);
    assert!(!media.path().join("crashed").exists());
    assert!(media.path().join("kept").is_dir());
}

#[test]
fn error_codes_are_stable() {
    let conn = open_db_in_memory().unwrap();
    let media = tempfile::tempdir().unwrap();
    let gallery = service(&conn, media.path());

    let validation = gallery.publish(&admin(), draft(" ", &[])).unwrap_err();
    assert_eq!(validation.code(), "validation");

    let not_found = gallery.view(ProjectId::new(9).unwrap()).unwrap_err();
    assert_eq!(not_found.code(), "not_found");
    assert_eq!(not_found.to_string(), "project not found: 9");
}
