mod helpers;

use helpers::fixtures::{assay, external_study, program, study};
use helpers::{setup_local_storage, write_source};
use labfolio_core::{ConflictPolicy, EntityRef};
use labfolio_storage::{NamingService, StorageError};
use std::path::Path;

#[tokio::test]
async fn test_program_study_assay_workflow() {
    let test = setup_local_storage(ConflictPolicy::Fail, 1).await;
    let storage = test.storage();

    let program_folder = storage.create_program_folder(&program()).await.unwrap();
    assert_eq!(program_folder.name, "Clinical Program A");

    let study_folder = storage.create_study_folder(&study()).await.unwrap();
    assert_eq!(study_folder.name, "Study X (CPA-12345)");
    assert_eq!(
        Path::new(&study_folder.path),
        Path::new(&program_folder.path).join("Study X (CPA-12345)")
    );

    let second = storage.create_study_folder(&study()).await;
    assert!(matches!(second, Err(StorageError::Duplicate(_))));

    storage.create_assay_folder(&assay()).await.unwrap();
    let source = write_source(&test.dir, "plate-reader.csv", b"well,od\nA1,0.42\n");
    let saved = storage
        .save_file(&source, EntityRef::Assay(&assay()))
        .await
        .unwrap();
    assert!(saved.url.ends_with("/plate-reader.csv"));

    let listed = storage.get_folder(EntityRef::Study(&study()), true).await.unwrap();
    let assay_folder = listed.sub_folder("Binding Assay (CPA-12345-001)").unwrap();
    assert_eq!(assay_folder.file("plate-reader.csv").unwrap().size, Some(16));
}

#[tokio::test]
async fn test_create_then_get_returns_same_path() {
    let test = setup_local_storage(ConflictPolicy::Fail, 1).await;
    let storage = test.storage();

    let created = storage.create_assay_folder(&assay()).await.unwrap();
    let fetched = storage.get_assay_folder(&assay(), false).await.unwrap();
    assert_eq!(created.path, fetched.path);
    assert_eq!(created.url, fetched.url);

    let resolved = storage.folder_at(&created.path, false).await.unwrap();
    assert_eq!(resolved.name, "Binding Assay (CPA-12345-001)");
}

#[tokio::test]
async fn test_save_into_never_created_folder_fails() {
    let test = setup_local_storage(ConflictPolicy::UseExisting, 1).await;
    let storage = test.storage();
    let source = write_source(&test.dir, "results.csv", b"data");

    let result = storage.save_file(&source, EntityRef::Assay(&assay())).await;
    assert!(matches!(result, Err(StorageError::NotFound(_))));

    let result = storage.get_program_folder(&program(), false).await;
    assert!(matches!(result, Err(StorageError::NotFound(_))));
}

#[tokio::test]
async fn test_external_study_uses_generated_code() {
    let test = setup_local_storage(ConflictPolicy::Fail, 0).await;
    let storage = test.storage();
    let naming = NamingService::default();

    assert_eq!(naming.external_study_code(0), external_study().code);
    let folder = storage.create_study_folder(&external_study()).await.unwrap();
    assert_eq!(folder.name, "Partner Tox Study (EX-00001)");

    let program_folder = storage.get_program_folder(&program(), true).await.unwrap();
    assert_eq!(program_folder.sub_folders.len(), 1);
    assert_eq!(program_folder.listed_depth(), 1);
}

#[tokio::test]
async fn test_concurrent_creation_yields_one_folder() {
    let test = setup_local_storage(ConflictPolicy::Fail, 1).await;

    let mut handles = Vec::new();
    for _ in 0..4 {
        let storage = test.storage.clone();
        handles.push(tokio::spawn(async move {
            storage.create_study_folder(&study()).await
        }));
    }

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(StorageError::Duplicate(_)) => {}
            Err(e) => panic!("unexpected error: {}", e),
        }
    }
    assert_eq!(created, 1);
}
