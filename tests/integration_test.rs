// file: tests/integration_test.rs
// version: 2.0.0
// guid: 0d7e4f3a-91b2-4c8d-a6e5-3f2b1c9d8e70

//! Integration tests for the template import pipeline

use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use pve_cloud_templates::{
    config::ConfigLoader,
    exec::{CommandOutput, CommandRunner, HostCommand},
    image::ImagePaths,
    importer::{TemplateImporter, TemplateStatus},
    network::ImageSource,
    pve::{StorageKind, StorageResolver, VmRegistry},
    Result,
};

const PVESH_STORAGE: &str = r#"[
  {"storage":"local","content":"iso,vztmpl,backup,images","type":"dir","path":"/var/lib/vz"},
  {"storage":"local-zfs","content":"images,rootdir","type":"zfspool","pool":"rpool/data"},
  {"storage":"backups","content":"backup","type":"nfs"}
]"#;

/// Records commands; answers `pvesh` with a canned inventory
#[derive(Default)]
struct FakeHost {
    commands: Vec<String>,
}

#[async_trait::async_trait]
impl CommandRunner for FakeHost {
    async fn run(&mut self, command: &HostCommand) -> Result<CommandOutput> {
        self.commands.push(command.to_string());
        Ok(CommandOutput::success(""))
    }

    async fn capture(&mut self, command: &HostCommand) -> Result<CommandOutput> {
        self.commands.push(command.to_string());
        if command.program == "pvesh" {
            return Ok(CommandOutput::success(PVESH_STORAGE));
        }
        Ok(CommandOutput::success(""))
    }
}

#[derive(Clone, Default)]
struct FakeMirror {
    urls: Arc<Mutex<Vec<String>>>,
}

#[async_trait::async_trait]
impl ImageSource for FakeMirror {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<u64> {
        self.urls.lock().unwrap().push(url.to_string());
        tokio::fs::write(dest, b"QFI\xfb").await?;
        Ok(4)
    }
}

const TEMPLATES: &str = r#"
templates:
  - vmid: 9000
    name: debian12
    url: https://example/debian12.qcow2
    cloud_init: true
  - vmid: 9001
    name: ubuntu2404
    url: https://example/noble.img
    customize:
      commands:
        - apt-get install -y qemu-guest-agent
    cloud_init: true
  - vmid: 9002
    name: alpine
    url: https://example/alpine.qcow2
    cloud_init: false
"#;

#[tokio::test]
async fn test_debian_on_dir_storage_end_to_end() -> Result<()> {
    let vm_dir = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let work_dir = work.path().join("cloud_img");

    let list = ConfigLoader::new().parse_templates(TEMPLATES)?;

    let mut host = FakeHost::default();
    let storage = StorageResolver::new().resolve(&mut host, "local").await?;
    assert_eq!(storage.kind, StorageKind::File);
    host.commands.clear();

    let mirror = FakeMirror::default();
    let summary = {
        let mut importer = TemplateImporter::new(
            &mut host,
            mirror.clone(),
            storage,
            VmRegistry::new(vm_dir.path()),
            &work_dir,
        );
        importer.import_all(&list, Some("debian12")).await?
    };

    assert_eq!(summary.reports.len(), 1);
    assert_eq!(summary.reports[0].status, TemplateStatus::Imported);
    assert_eq!(
        *mirror.urls.lock().unwrap(),
        vec!["https://example/debian12.qcow2".to_string()]
    );

    let image = work_dir.join("debian12.img");
    assert_eq!(
        host.commands,
        vec![
            "qm create 9000 --name debian12 --memory 512 --net0 virtio,bridge=vmbr0".to_string(),
            format!("qm importdisk 9000 {} local --format qcow2", image.display()),
            "qm set 9000 --scsihw virtio-scsi-pci --scsi0 local:9000/vm-9000-disk-0.qcow2".to_string(),
            "qm set 9000 --boot c --bootdisk scsi0".to_string(),
            "qm set 9000 --serial0 socket".to_string(),
            "qm set 9000 --ide2 local:cloudinit".to_string(),
            "qm set 9000 --ciuser root".to_string(),
            "qm template 9000".to_string(),
        ]
    );

    let paths = ImagePaths::for_template(&work_dir, "debian12");
    assert!(!paths.image.exists());
    assert!(!paths.download.exists());

    Ok(())
}

#[tokio::test]
async fn test_full_run_skips_existing_and_uses_raw_names() -> Result<()> {
    let vm_dir = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    std::fs::write(vm_dir.path().join("9000.conf"), "template: 1\n").unwrap();

    let list = ConfigLoader::new().parse_templates(TEMPLATES)?;
    let mut host = FakeHost::default();
    let storage = StorageResolver::new().resolve(&mut host, "local-zfs").await?;
    host.commands.clear();

    let mirror = FakeMirror::default();
    let summary = {
        let mut importer = TemplateImporter::new(
            &mut host,
            mirror.clone(),
            storage,
            VmRegistry::new(vm_dir.path()),
            work.path(),
        );
        importer.import_all(&list, None).await?
    };

    let statuses: Vec<_> = summary.reports.iter().map(|r| r.status.clone()).collect();
    assert_eq!(
        statuses,
        vec![
            TemplateStatus::Skipped,
            TemplateStatus::Imported,
            TemplateStatus::Imported
        ]
    );
    assert_eq!(mirror.urls.lock().unwrap().len(), 2);
    assert!(!host.commands.iter().any(|c| c.contains(" 9000")));

    let customize = host
        .commands
        .iter()
        .position(|c| c.contains("virt-customize"))
        .expect("customization ran");
    let create = host
        .commands
        .iter()
        .position(|c| c.starts_with("qm create 9001"))
        .expect("vm created");
    assert!(customize < create);
    assert!(host
        .commands
        .contains(&"qm set 9001 --scsihw virtio-scsi-pci --scsi0 local-zfs:vm-9001-disk-0".to_string()));
    assert!(!host.commands.iter().any(|c| c == "qm set 9002 --ciuser root"));
    assert_eq!(host.commands.iter().filter(|c| c.contains("virt-customize")).count(), 1);

    Ok(())
}

#[tokio::test]
async fn test_filter_processes_only_named_template() -> Result<()> {
    let vm_dir = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let list = ConfigLoader::new().parse_templates(TEMPLATES)?;

    let mut host = FakeHost::default();
    let storage = StorageResolver::new().resolve(&mut host, "local").await?;
    host.commands.clear();

    let mirror = FakeMirror::default();
    {
        let mut importer = TemplateImporter::new(
            &mut host,
            mirror.clone(),
            storage,
            VmRegistry::new(vm_dir.path()),
            work.path(),
        );
        let summary = importer.import_all(&list, Some("ubuntu2404")).await?;
        assert_eq!(summary.reports.len(), 1);
        assert_eq!(summary.reports[0].vmid, 9001);
    }

    assert!(host
        .commands
        .iter()
        .all(|c| !c.contains(" 9000") && !c.contains(" 9002")));
    assert_eq!(
        *mirror.urls.lock().unwrap(),
        vec!["https://example/noble.img".to_string()]
    );

    Ok(())
}

#[tokio::test]
async fn test_storage_without_images_is_rejected() {
    let mut host = FakeHost::default();
    let err = StorageResolver::new()
        .resolve(&mut host, "backups")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("does not support VM images"));
    assert_eq!(err.exit_code(), 1);
}
