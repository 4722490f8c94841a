pub mod add_note;
pub mod auto_fix;
pub mod auto_transition;
pub mod dispatch;
pub mod list;
pub mod shared;
pub mod show;
pub mod status;
pub mod validate;

#[cfg(test)]
pub mod test_support {
    use std::fs;
    use std::path::Path;

    use tw_config::TaskwardConfig;

    use crate::cli::{GlobalFlags, OutputFormat};
    use crate::context::AppContext;

    /// Write a task file under `<root>/<dir>/<id>.md`.
    pub fn write_task(root: &Path, dir: &str, id: &str, status: &str, agent: &str, deps: &[&str]) {
        let path = root.join(dir).join(format!("{id}.md"));
        fs::create_dir_all(path.parent().expect("task file has a parent"))
            .expect("create status dir");
        let content = format!(
            "---\nid: {id}\ntitle: Implement {id}\nagent: {agent}\nstatus: {status}\ncreated_at: 2025-01-10T09:30:00Z\nupdated_at: 2025-01-10T09:30:00Z\ndependencies: [{}]\n---\n\nNotes for {id}\n",
            deps.join(", ")
        );
        fs::write(path, content).expect("write task file");
    }

    pub fn ctx(root: &Path) -> AppContext {
        let root = root.to_str().expect("utf-8 temp path");
        AppContext::init(TaskwardConfig::default(), Some(root))
    }

    pub fn flags() -> GlobalFlags {
        GlobalFlags {
            format: OutputFormat::Raw,
            quiet: true,
            root: None,
        }
    }
}
