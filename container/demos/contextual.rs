use fibre_container::{injectable, resolve, Container, ContainerConfig};
use std::sync::Arc;

trait Storage: Send + Sync {
  fn describe(&self) -> &'static str;
}

struct LocalDisk;
impl Storage for LocalDisk {
  fn describe(&self) -> &'static str {
    "local disk"
  }
}

struct ObjectStore;
impl Storage for ObjectStore {
  fn describe(&self) -> &'static str {
    "object store"
  }
}

struct Uploads {
  storage: Arc<dyn Storage>,
}
injectable!(Uploads { storage: dyn Storage });

struct Backups {
  storage: Arc<dyn Storage>,
}
injectable!(Backups { storage: dyn Storage });

const CONFIG: &str = r#"
name: contextual-demo
aliases:
  files: Uploads
contextual:
  - when: Backups
    needs: Storage
    give: ObjectStore
"#;

fn main() -> fibre_container::Result<()> {
  let config = ContainerConfig::from_yaml_str(CONFIG)?;
  let container = Container::with_config(&config);

  container.instance_arc::<dyn Storage>("Storage", Arc::new(LocalDisk))?;
  container.instance_arc::<dyn Storage>("ObjectStore", Arc::new(ObjectStore))?;
  container.singleton_type::<Uploads>()?;
  container.singleton_type::<Backups>()?;

  // Aliases and overrides refer to the services above, so apply them last.
  container.apply_config(&config)?;

  let uploads = resolve!(container, Uploads, "files")?;
  let backups = resolve!(container, Backups)?;
  println!("uploads -> {}", uploads.storage.describe());
  println!("backups -> {}", backups.storage.describe());
  Ok(())
}
