//! 剪贴板投递：
//! - 主路径：平台剪贴板写入
//! - 降级路径：临时离屏文本面 + 旧式同步复制，结束前无条件移除文本面
//! - 两步结果合并为 `CopyOutcome` 交给界面层

use std::io::Write;

use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;
use tracing::{debug, error};

/// 主路径失败，可以尝试降级
#[derive(Debug, Error)]
#[error("剪贴板写入失败: {0}")]
pub(crate) struct Retryable(pub(crate) String);

/// 降级路径也失败，本次复制终止
#[derive(Debug, Error)]
#[error("降级复制失败: {0}")]
pub(crate) struct Failed(pub(crate) String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CopyOutcome {
    Succeeded,
    SucceededViaFallback,
    Failed,
}

/// 平台剪贴板（浏览器中对应 `navigator.clipboard.writeText`）
pub(crate) trait PrimaryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), Retryable>;
}

/// 降级复制所需的宿主能力：挂载临时文本面、全选、执行旧式复制、移除
pub(crate) trait ScratchDocument {
    type Surface;

    fn attach_surface(&mut self, text: &str) -> Self::Surface;
    fn select_all(&mut self, surface: &Self::Surface);
    fn exec_copy(&mut self) -> Result<(), Failed>;
    fn remove_surface(&mut self, surface: Self::Surface);
}

pub(crate) fn attempt_primary<C: PrimaryClipboard>(clipboard: &mut C, text: &str) -> Result<(), Retryable> {
    clipboard.write_text(text)
}

pub(crate) fn attempt_fallback<D: ScratchDocument>(document: &mut D, text: &str) -> Result<(), Failed> {
    let surface = document.attach_surface(text);
    document.select_all(&surface);
    let result = document.exec_copy();
    document.remove_surface(surface);
    result
}

/// 先走主路径，失败才降级；失败不会继续向上传播
pub(crate) fn deliver<C, D>(clipboard: &mut C, document: &mut D, text: &str) -> CopyOutcome
where
    C: PrimaryClipboard,
    D: ScratchDocument,
{
    let Err(e) = attempt_primary(clipboard, text) else {
        return CopyOutcome::Succeeded;
    };
    debug!(error = %e, "primary clipboard rejected, trying fallback");
    match attempt_fallback(document, text) {
        Ok(()) => CopyOutcome::SucceededViaFallback,
        Err(e) => {
            error!(error = %e, "copy failed");
            CopyOutcome::Failed
        }
    }
}

/// 系统剪贴板（arboard）。
/// X11 上剪贴板内容由持有句柄的进程提供，句柄随本结构体存活，
/// 进程退出后内容能否保留取决于是否有剪贴板管理器接手。
#[derive(Default)]
pub(crate) struct SystemClipboard {
    ctx: Option<arboard::Clipboard>,
}

impl std::fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemClipboard").field("open", &self.ctx.is_some()).finish()
    }
}

impl SystemClipboard {
    #[cfg(test)]
    pub(crate) fn is_open(&self) -> bool { self.ctx.is_some() }
}

impl PrimaryClipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), Retryable> {
        let ctx = match self.ctx.take() {
            Some(ctx) => ctx,
            None => arboard::Clipboard::new().map_err(|e| Retryable(format!("clipboard init: {}", e)))?,
        };
        let ctx = self.ctx.insert(ctx);
        ctx.set_text(text.to_owned()).map_err(|e| Retryable(format!("clipboard set: {}", e)))
    }
}

/// 终端降级：文本面是内存缓冲，"旧式复制"是向终端写 OSC 52 序列
#[derive(Debug)]
pub(crate) struct TerminalDocument<W: Write> {
    out: W,
    selection: Option<String>,
}

/// 终端文本面的句柄
#[derive(Debug)]
pub(crate) struct TerminalSurface {
    text: String,
}

impl<W: Write> TerminalDocument<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out, selection: None }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W { self.out }
}

impl<W: Write> ScratchDocument for TerminalDocument<W> {
    type Surface = TerminalSurface;

    fn attach_surface(&mut self, text: &str) -> TerminalSurface {
        TerminalSurface { text: text.to_string() }
    }

    fn select_all(&mut self, surface: &TerminalSurface) {
        self.selection = Some(surface.text.clone());
    }

    fn exec_copy(&mut self) -> Result<(), Failed> {
        let text = self.selection.as_deref().ok_or_else(|| Failed("nothing selected".into()))?;
        let seq = osc52(text);
        self.out.write_all(seq.as_bytes()).and_then(|_| self.out.flush()).map_err(|e| Failed(e.to_string()))
    }

    fn remove_surface(&mut self, _surface: TerminalSurface) {
        self.selection = None;
    }
}

/// OSC 52：让终端模拟器把文本写入系统剪贴板
pub(crate) fn osc52(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", general_purpose::STANDARD.encode(text))
}


#[cfg(test)]
mod tests {
    use super::fakes::{FakeClipboard, FakeDocument};
    use super::*;

    #[test]
    fn primary_success_skips_fallback() {
        let mut c = FakeClipboard::default();
        let mut d = FakeDocument::default();
        assert_eq!(deliver(&mut c, &mut d, "cmd"), CopyOutcome::Succeeded);
        assert_eq!(c.written, vec!["cmd".to_string()]);
        assert_eq!(d.surfaces_created, 0);
    }

    #[test]
    fn rejection_falls_back() {
        let mut c = FakeClipboard { reject: true, ..Default::default() };
        let mut d = FakeDocument::default();
        assert_eq!(deliver(&mut c, &mut d, "cmd"), CopyOutcome::SucceededViaFallback);
        assert_eq!(d.copied, vec!["cmd".to_string()]);
        assert!(d.attached.is_empty());
    }

    #[test]
    fn double_failure_still_removes_surface() {
        let mut c = FakeClipboard { reject: true, ..Default::default() };
        let mut d = FakeDocument { fail_copy: true, ..Default::default() };
        assert_eq!(deliver(&mut c, &mut d, "cmd"), CopyOutcome::Failed);
        assert_eq!(d.surfaces_created, 1);
        assert!(d.attached.is_empty());
        assert!(d.copied.is_empty());
    }

    #[test]
    fn system_clipboard_keeps_its_handle() {
        // 无图形环境时初始化会失败，只在写入成功时检查
        let mut c = SystemClipboard::default();
        match c.write_text("bash bootstrap.sh \"MyApps\"") {
            Ok(()) => assert!(c.is_open()),
            Err(_) => assert!(!c.is_open()),
        }
    }

    #[test]
    fn terminal_fallback_writes_osc52() {
        let mut doc = TerminalDocument::new(Vec::new());
        attempt_fallback(&mut doc, "hi").unwrap();
        let out = String::from_utf8(doc.into_inner()).unwrap();
        assert_eq!(out, "\x1b]52;c;aGk=\x07");
    }

    #[test]
    fn terminal_exec_copy_without_selection_fails() {
        let mut doc = TerminalDocument::new(Vec::new());
        assert!(doc.exec_copy().is_err());
    }
}
