//! 页面会话控制器
//!
//! 持有一次页面会话的全部可变状态：已选路径、命令展示区、复制按钮、通知与定时器。
//! 已选路径只由 `on_select` 写入；安装命令每次使用时从已选路径重新计算。
//! 时间通过 `advance_to` / `advance_by` 显式推进，不依赖真实时钟。

use crate::clipboard::{deliver, CopyOutcome, PrimaryClipboard, ScratchDocument};
use crate::composer::{derive_folder, Composer, SelectionEvent};
use crate::notification::{NotificationId, NotificationKind, Notifier};
use crate::timers::{Millis, TimerQueue};

/// 复制成功后按钮保持"已复制"的时长
pub(crate) const COPIED_STATE_MS: Millis = 2000;
pub(crate) const COPY_LABEL: &str = "复制命令";
pub(crate) const COPIED_LABEL: &str = "已复制";

/// 页面形态：简单版（复制按钮 + 弹窗报错）与拖放版（仅通知）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Variant {
    Simple,
    DragDrop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerKey {
    Notification(NotificationId),
    CopiedButton,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CopyButton {
    pub(crate) label: String,
    pub(crate) disabled: bool,
    saved_label: Option<String>,
}

impl Default for CopyButton {
    fn default() -> Self {
        Self { label: COPY_LABEL.to_string(), disabled: false, saved_label: None }
    }
}

impl CopyButton {
    // 已处于"已复制"时不覆盖保存的原始文案
    fn mark_copied(&mut self) {
        if self.saved_label.is_none() {
            self.saved_label = Some(std::mem::replace(&mut self.label, COPIED_LABEL.to_string()));
        }
        self.disabled = true;
    }

    fn revert(&mut self) {
        if let Some(label) = self.saved_label.take() {
            self.label = label;
        }
        self.disabled = false;
    }
}

/// 命令展示区；只有成功提取路径后才可见
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CommandDisplay {
    pub(crate) visible: bool,
    pub(crate) html: String,
}

#[derive(Debug)]
pub(crate) struct Session<C, D> {
    variant: Variant,
    composer: Composer,
    selected_path: String,
    display: CommandDisplay,
    button: CopyButton,
    notifier: Notifier,
    alerts: Vec<String>,
    timers: TimerQueue<TimerKey, ()>,
    clipboard: C,
    document: D,
}

impl<C: PrimaryClipboard, D: ScratchDocument> Session<C, D> {
    pub(crate) fn new(variant: Variant, composer: Composer, clipboard: C, document: D) -> Self {
        Self {
            variant,
            composer,
            selected_path: String::new(),
            display: CommandDisplay::default(),
            button: CopyButton::default(),
            notifier: Notifier::default(),
            alerts: Vec::new(),
            timers: TimerQueue::new(),
            clipboard,
            document,
        }
    }

    /// 处理一次选择事件；无法提取路径时不改任何状态并返回 false
    pub(crate) fn on_select(&mut self, event: &SelectionEvent) -> bool {
        let Some(folder) = derive_folder(event) else { return false };
        self.display.html = self.composer.render_html(&folder);
        self.display.visible = true;
        self.selected_path = folder;
        true
    }

    pub(crate) fn install_command(&self) -> Option<String> {
        if self.selected_path.is_empty() { return None; }
        Some(self.composer.command_for(&self.selected_path))
    }

    /// 复制当前安装命令；尚未选择路径时返回 None
    pub(crate) fn on_copy_requested(&mut self) -> Option<CopyOutcome> {
        let command = self.install_command()?;
        let outcome = deliver(&mut self.clipboard, &mut self.document, &command);
        match outcome {
            CopyOutcome::Succeeded => {
                self.notifier.show(NotificationKind::Success, &mut self.timers);
                if self.variant == Variant::Simple {
                    self.button.mark_copied();
                    // 重复触发时重新计时，而不是让旧定时器提前恢复按钮
                    self.timers.schedule(TimerKey::CopiedButton, COPIED_STATE_MS, ());
                }
            }
            CopyOutcome::SucceededViaFallback => {
                self.notifier.show(NotificationKind::Success, &mut self.timers);
            }
            CopyOutcome::Failed => match self.variant {
                Variant::Simple => self.alerts.push(NotificationKind::Failure.message().to_string()),
                Variant::DragDrop => {
                    self.notifier.show(NotificationKind::Failure, &mut self.timers);
                }
            },
        }
        Some(outcome)
    }

    /// 把会话时钟推进到 `t`，依次处理到期定时器
    pub(crate) fn advance_to(&mut self, t: Millis) {
        while let Some((key, ())) = self.timers.pop_due(t) {
            match key {
                TimerKey::Notification(id) => self.notifier.on_timer(id, &mut self.timers),
                TimerKey::CopiedButton => self.button.revert(),
            }
        }
    }

    pub(crate) fn advance_by(&mut self, ms: Millis) {
        let t = self.timers.now() + ms;
        self.advance_to(t);
    }

    #[cfg(test)]
    pub(crate) fn now(&self) -> Millis { self.timers.now() }
    #[cfg(test)]
    pub(crate) fn selected_path(&self) -> &str { &self.selected_path }
    pub(crate) fn display(&self) -> &CommandDisplay { &self.display }
    pub(crate) fn button(&self) -> &CopyButton { &self.button }
    pub(crate) fn notifier(&self) -> &Notifier { &self.notifier }
    pub(crate) fn alerts(&self) -> &[String] { &self.alerts }

    #[cfg(test)]
    pub(crate) fn parts_mut(&mut self) -> (&mut C, &mut D) { (&mut self.clipboard, &mut self.document) }
}
