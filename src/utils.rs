//! 通用辅助函数：
//! - 环境变量读取与解析
//! - 本地路径到选择事件的转换

use std::{env, path::{Component, Path, PathBuf}};
use anyhow::{bail, Context, Result};

use crate::composer::{DroppedItem, SelectionEvent};

/// 可选读取 PATH 环境变量为 PathBuf。
pub(crate) fn env_opt_path(key: &str) -> Option<PathBuf> {
    env::var_os(key).map(PathBuf::from).filter(|p| !p.as_os_str().is_empty())
}

/// 可选读取 String 环境变量。
pub(crate) fn env_opt_string(key: &str) -> Option<String> {
    env::var(key).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// 读取布尔环境变量的真值（1/true/on/yes/y）。
pub(crate) fn env_bool_truthy(key: &str) -> Option<bool> {
    env::var(key).ok().map(|v| parse_truthy(&v))
}

fn parse_truthy(v: &str) -> bool {
    matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "on" | "yes" | "y")
}

/// 把本地路径按拖放语义转成选择事件：目录取自身名字，文件取 `/` 开头的完整路径。
/// 路径先规范化，`..`、`.` 与符号链接都按文件系统解析。
/// 拖放根是当前目录；当前目录之外的文件，完整路径里保留绝对路径，推导出的文件夹也是绝对路径。
pub(crate) fn selection_from_path(path: &Path) -> Result<SelectionEvent> {
    if !path.exists() { bail!("路径不存在: {}", path.display()); }
    let resolved = path
        .canonicalize()
        .with_context(|| format!("无法解析路径: {}", path.display()))?;
    let item = if resolved.is_dir() {
        // 根目录没有名字
        DroppedItem::Directory { name: normal_segments(&resolved).last().cloned().unwrap_or_default() }
    } else {
        let cwd = env::current_dir().and_then(|d| d.canonicalize()).ok();
        let full_path = match cwd.as_deref().and_then(|d| resolved.strip_prefix(d).ok()) {
            Some(rel) => format!("/{}", normal_segments(rel).join("/")),
            None => format!("//{}", normal_segments(&resolved).join("/")),
        };
        DroppedItem::File { full_path }
    };
    Ok(SelectionEvent::Drop(vec![item]))
}

// 只保留普通路径段
fn normal_segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::derive_folder;
    use std::fs;

    #[test]
    fn truthy_values() {
        for v in ["1", "true", "ON", " yes ", "y"] { assert!(parse_truthy(v), "{}", v); }
        for v in ["0", "false", "off", "", "maybe"] { assert!(!parse_truthy(v), "{}", v); }
    }

    #[test]
    fn directory_becomes_dropped_directory() {
        let dir = tempfile::tempdir().unwrap();
        let apps = dir.path().join("MyApps");
        fs::create_dir(&apps).unwrap();
        let event = selection_from_path(&apps).unwrap();
        assert_eq!(event, SelectionEvent::Drop(vec![DroppedItem::Directory { name: "MyApps".into() }]));
    }

    #[test]
    fn file_becomes_dropped_file() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("Installers");
        fs::create_dir(&sub).unwrap();
        let file = sub.join("app.dmg");
        fs::write(&file, b"").unwrap();
        match selection_from_path(&file).unwrap() {
            SelectionEvent::Drop(items) => match &items[0] {
                DroppedItem::File { full_path } => assert!(full_path.ends_with("/Installers/app.dmg")),
                other => panic!("unexpected item {:?}", other),
            },
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn parent_components_resolve_to_the_real_folder() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("x");
        fs::create_dir(&real).unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::write(real.join("app.dmg"), b"").unwrap();

        let event = selection_from_path(&dir.path().join("a").join("..").join("x").join("app.dmg")).unwrap();
        let folder = derive_folder(&event).unwrap();
        assert_eq!(Path::new(&folder), real.canonicalize().unwrap());
        assert!(Path::new(&folder).is_dir());
    }

    #[test]
    fn files_under_current_dir_stay_relative() {
        // cargo 以包根目录为测试的当前目录
        for input in ["src/utils.rs", "./src/../src/utils.rs"] {
            let event = selection_from_path(Path::new(input)).unwrap();
            assert_eq!(event, SelectionEvent::Drop(vec![DroppedItem::File { full_path: "/src/utils.rs".into() }]));
            assert_eq!(derive_folder(&event).as_deref(), Some("src"));
        }
    }

    #[test]
    fn dot_directory_uses_its_real_name() {
        let dir = tempfile::tempdir().unwrap();
        let apps = dir.path().join("MyApps");
        fs::create_dir(&apps).unwrap();
        let event = selection_from_path(&apps.join(".")).unwrap();
        assert_eq!(event, SelectionEvent::Drop(vec![DroppedItem::Directory { name: "MyApps".into() }]));
    }

    #[test]
    fn missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(selection_from_path(&dir.path().join("nope")).is_err());
    }
}
