//! 安装命令生成模块：
//! - 从选择事件（文件选择器 / 拖放目录 / 拖放单个文件）中提取文件夹路径
//! - 把路径代入 `bash <script> "<path>"` 模板
//! - 以 Markdown 代码块渲染为 HTML 供展示

use crate::config::DEFAULT_SCRIPT_NAME;

/// 文件选择器中的一个文件（目录模式下带相对路径，如 `MyApps/a.dmg`）
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PickedFile {
    pub(crate) relative_path: String,
}

/// 拖放进来的一项
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DroppedItem {
    Directory { name: String },
    /// `full_path` 以 `/` 开头，相对于拖放根
    File { full_path: String },
    /// 非文件系统条目（文本、链接等）
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectionEvent {
    Picker(Vec<PickedFile>),
    Drop(Vec<DroppedItem>),
}

/// 提取文件夹路径；得不到非空路径时返回 None，调用方应忽略该事件
pub(crate) fn derive_folder(event: &SelectionEvent) -> Option<String> {
    let folder = match event {
        SelectionEvent::Picker(files) => folder_from_picker(files),
        SelectionEvent::Drop(items) => folder_from_drop(items),
    }?;
    if folder.is_empty() { None } else { Some(folder) }
}

fn folder_from_picker(files: &[PickedFile]) -> Option<String> {
    let first = files.first()?;
    first.relative_path.split('/').next().map(str::to_string)
}

// 只看第一个目录或文件条目，其余忽略
fn folder_from_drop(items: &[DroppedItem]) -> Option<String> {
    let item = items.iter().find(|i| !matches!(i, DroppedItem::Other))?;
    match item {
        DroppedItem::Directory { name } => Some(name.clone()),
        DroppedItem::File { full_path } => containing_folder(full_path),
        DroppedItem::Other => None,
    }
}

/// `/Downloads/Installers/app.dmg` -> `Downloads/Installers`；顶层文件没有所在目录
pub(crate) fn containing_folder(full_path: &str) -> Option<String> {
    let trimmed = full_path.strip_prefix('/').unwrap_or(full_path);
    let (parent, _) = trimmed.rsplit_once('/')?;
    if parent.is_empty() { None } else { Some(parent.to_string()) }
}

/// 双引号内转义 `\` `"` `$` `` ` ``，其余字符原样保留
pub(crate) fn shell_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if matches!(c, '\\' | '"' | '$' | '`') { out.push('\\'); }
        out.push(c);
    }
    out.push('"');
    out
}

#[derive(Debug, Clone)]
pub(crate) struct Composer {
    script_name: String,
}

impl Default for Composer {
    fn default() -> Self { Self::new(DEFAULT_SCRIPT_NAME) }
}

impl Composer {
    pub(crate) fn new(script_name: impl Into<String>) -> Self {
        Self { script_name: script_name.into() }
    }

    pub(crate) fn command_for(&self, folder: &str) -> String {
        format!("bash {} {}", self.script_name, shell_quote(folder))
    }

    pub(crate) fn render_html(&self, folder: &str) -> String {
        render_markdown(&fenced(&self.command_for(folder)))
    }
}

// 围栏比命令里最长的连续反引号更长，命令内容不会提前结束代码块
fn fenced(command: &str) -> String {
    let longest = command
        .split(|c: char| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest.max(2) + 1);
    format!("{fence}bash\n{command}\n{fence}\n")
}

/// Markdown 转 HTML，并清理掉可能注入的标签
pub(crate) fn render_markdown(markdown: &str) -> String {
    let html = comrak::markdown_to_html(markdown, &comrak::Options::default());
    ammonia::clean(&html)
}
