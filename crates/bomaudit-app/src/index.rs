//! The `index` use case: fold analyzer output into the provider directory.

use anyhow::Context;
use bomaudit_repo::{IndexStats, MetaDbLayout, directory};
use tracing::info;

/// Load (or start) the directory, enlarge it from `tags_root`, then persist both mappings.
pub fn run_index(layout: &MetaDbLayout) -> anyhow::Result<IndexStats> {
    let mut dir = directory::load_or_default(&layout.directory_path)
        .context("load provider directory")?;
    let before = dir.len();
    let stats = directory::enlarge(&mut dir, &layout.tags_root).context("enlarge directory")?;
    directory::save(&dir, &layout.directory_path).context("save provider directory")?;
    directory::save_inverse(&dir, &layout.inverse_path).context("save inverse directory")?;
    info!(
        path = %layout.directory_path,
        before,
        after = dir.len(),
        "provider directory written"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bomaudit_test_util::{meta_info, utf8, write_json};

    #[test]
    fn index_is_idempotent() {
        let tmp = tempfile::TempDir::new().expect("temp dir");
        let root = utf8(tmp.path());
        let layout = MetaDbLayout::new(&root.join("metaDB"), &root.join("results"));
        write_json(
            &layout.tags_root.join("org.x/x/1.0/meta_info.json"),
            &meta_info(&[("org.x", &[])]),
        )
        .expect("write");

        let first = run_index(&layout).expect("first");
        assert_eq!(first.added, 1);
        let written = std::fs::read(&layout.directory_path).expect("read");

        let second = run_index(&layout).expect("second");
        assert_eq!(second.added, 0);
        assert_eq!(second.already_present, 1);
        assert_eq!(std::fs::read(&layout.directory_path).expect("reread"), written);
        assert!(layout.inverse_path.is_file());
    }
}
