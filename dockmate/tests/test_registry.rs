use std::{fs, sync::Arc, time::Duration};

use dockmate::{registry::ProjectRegistry, DockmateError};

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[test_log::test(tokio::test)]
async fn test_registry_is_empty_until_refreshed() -> anyhow::Result<()> {
    let root = tempfile::tempdir()?;
    fs::write(root.path().join("api.yaml"), "image_repo: api\n")?;

    let registry = ProjectRegistry::with_retry(root.path(), 1, Duration::ZERO);
    assert!(registry.projects().await.is_empty());
    assert_eq!(registry.scans(), 0);

    let projects = registry.refresh().await?;
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].get_name(), "api");
    assert_eq!(registry.scans(), 1);

    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_registry_refresh_picks_up_changes() -> anyhow::Result<()> {
    let root = tempfile::tempdir()?;
    fs::write(root.path().join("api.yaml"), "image_repo: api\n")?;

    let registry = ProjectRegistry::with_retry(root.path(), 1, Duration::ZERO);
    registry.refresh().await?;

    fs::create_dir(root.path().join("web"))?;
    fs::write(root.path().join("web/web.yaml"), "image_repo: web\n")?;
    fs::remove_file(root.path().join("api.yaml"))?;

    // The snapshot only changes on refresh.
    assert_eq!(registry.projects().await[0].get_name(), "api");

    let projects = registry.refresh().await?;
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].get_name(), "web");
    assert_eq!(projects[0].dir(), root.path().join("web"));

    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_registry_project_lookup() -> anyhow::Result<()> {
    let root = tempfile::tempdir()?;
    fs::write(
        root.path().join("api.yml"),
        "image_repo: api\nmodes: [prod, dev]\n",
    )?;

    let registry = ProjectRegistry::with_retry(root.path(), 1, Duration::ZERO);
    registry.refresh().await?;

    let project = registry.project("api").await?;
    assert_eq!(project.get_config().modes(), vec!["prod", "dev"]);

    assert!(matches!(
        registry.project("web").await,
        Err(DockmateError::ProjectNotFound(ref name)) if name == "web"
    ));

    Ok(())
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn test_registry_concurrent_refreshes_all_see_the_scan() -> anyhow::Result<()> {
    let root = tempfile::tempdir()?;
    fs::write(root.path().join("api.yaml"), "image_repo: api\n")?;

    let registry = Arc::new(ProjectRegistry::with_retry(root.path(), 1, Duration::ZERO));
    let mut handles = Vec::new();
    for _ in 0..8 {
        let registry = Arc::clone(&registry);
        handles.push(tokio::spawn(async move { registry.refresh().await }));
    }

    for handle in handles {
        let projects = handle.await??;
        assert_eq!(projects.len(), 1);
    }

    let scans = registry.scans();
    assert!((1..=8).contains(&scans));

    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_registry_reports_scan_that_gave_up() -> anyhow::Result<()> {
    let root = tempfile::tempdir()?;
    let missing = root.path().join("missing");

    let registry = ProjectRegistry::with_retry(&missing, 2, Duration::ZERO);
    let failed = tokio::spawn({
        let registry = registry.clone();
        async move { registry.failed().await }
    });

    let error = registry.refresh().await.unwrap_err();
    assert!(matches!(
        error,
        DockmateError::ProjectScanFailed { ref root, .. } if root == &missing
    ));
    assert!(matches!(
        failed.await?,
        DockmateError::ProjectScanFailed { .. }
    ));

    // The directory showing up clears the failure on the next scan.
    fs::create_dir(&missing)?;
    fs::write(missing.join("api.yaml"), "image_repo: api\n")?;
    assert_eq!(registry.refresh().await?.len(), 1);
    assert!(registry.failure().is_none());

    Ok(())
}
