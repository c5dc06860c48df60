//! 通知生命周期：created -> visible -> hidden -> destroyed
//! 每次显示都是独立实例，各自用自己的键挂定时器，互不取消。

use crate::session::TimerKey;
use crate::timers::{Millis, TimerQueue};

/// 创建后延迟显示，保证进入渲染树后过渡动画能生效
pub(crate) const SHOW_DELAY_MS: Millis = 100;
/// 自创建起开始隐藏的时间
pub(crate) const HIDE_AFTER_MS: Millis = 2000;
/// 隐藏过渡结束后销毁
pub(crate) const DESTROY_DELAY_MS: Millis = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NotificationKind {
    Success,
    Failure,
}

impl NotificationKind {
    pub(crate) fn message(self) -> &'static str {
        match self {
            NotificationKind::Success => "✅ 命令已复制到剪贴板",
            NotificationKind::Failure => "❌ 复制失败，请手动复制命令",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NotificationState {
    Created,
    Visible,
    Hidden,
    Destroyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NotificationId(u64);

#[derive(Debug, Clone)]
pub(crate) struct Notification {
    pub(crate) id: NotificationId,
    pub(crate) kind: NotificationKind,
    pub(crate) message: String,
    pub(crate) state: NotificationState,
    pub(crate) created_at: Millis,
    /// 进入各状态的时刻，依次为 visible / hidden / destroyed
    pub(crate) transitions: Vec<(NotificationState, Millis)>,
}

impl Notification {
    fn new(id: NotificationId, kind: NotificationKind, now: Millis) -> Self {
        Self {
            id,
            kind,
            message: kind.message().to_string(),
            state: NotificationState::Created,
            created_at: now,
            transitions: Vec::new(),
        }
    }

    /// 进入下一状态，返回距下一次转换的延迟
    fn advance(&mut self, now: Millis) -> Option<Millis> {
        let (next, delay) = match self.state {
            NotificationState::Created => (NotificationState::Visible, Some(HIDE_AFTER_MS - SHOW_DELAY_MS)),
            NotificationState::Visible => (NotificationState::Hidden, Some(DESTROY_DELAY_MS)),
            NotificationState::Hidden => (NotificationState::Destroyed, None),
            NotificationState::Destroyed => return None,
        };
        self.state = next;
        self.transitions.push((next, now));
        delay
    }

    pub(crate) fn entered_at(&self, state: NotificationState) -> Option<Millis> {
        if state == NotificationState::Created { return Some(self.created_at); }
        self.transitions.iter().find(|(s, _)| *s == state).map(|(_, t)| *t)
    }
}

/// 会话内全部通知（含已销毁的，便于回看）
#[derive(Debug, Default)]
pub(crate) struct Notifier {
    items: Vec<Notification>,
    next_id: u64,
}

impl Notifier {
    pub(crate) fn show(&mut self, kind: NotificationKind, timers: &mut TimerQueue<TimerKey, ()>) -> NotificationId {
        self.next_id += 1;
        let id = NotificationId(self.next_id);
        self.items.push(Notification::new(id, kind, timers.now()));
        timers.schedule(TimerKey::Notification(id), SHOW_DELAY_MS, ());
        id
    }

    pub(crate) fn on_timer(&mut self, id: NotificationId, timers: &mut TimerQueue<TimerKey, ()>) {
        let now = timers.now();
        let Some(n) = self.items.iter_mut().find(|n| n.id == id) else { return };
        if let Some(delay) = n.advance(now) {
            timers.schedule(TimerKey::Notification(id), delay, ());
        }
    }

    pub(crate) fn all(&self) -> &[Notification] {
        &self.items
    }

    #[cfg(test)]
    pub(crate) fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.items.iter().find(|n| n.id == id)
    }

    #[cfg(test)]
    pub(crate) fn count(&self, kind: NotificationKind) -> usize {
        self.items.iter().filter(|n| n.kind == kind).count()
    }

    /// 尚未销毁的通知
    pub(crate) fn live(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter().filter(|n| n.state != NotificationState::Destroyed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_until(n: &mut Notifier, timers: &mut TimerQueue<TimerKey, ()>, t: Millis) {
        while let Some((key, ())) = timers.pop_due(t) {
            if let TimerKey::Notification(id) = key { n.on_timer(id, timers); }
        }
    }

    #[test]
    fn lifecycle_timing() {
        let mut n = Notifier::default();
        let mut timers = TimerQueue::new();
        let id = n.show(NotificationKind::Success, &mut timers);

        run_until(&mut n, &mut timers, 99);
        assert_eq!(n.get(id).unwrap().state, NotificationState::Created);
        run_until(&mut n, &mut timers, 100);
        assert_eq!(n.get(id).unwrap().state, NotificationState::Visible);
        run_until(&mut n, &mut timers, 1999);
        assert_eq!(n.get(id).unwrap().state, NotificationState::Visible);
        run_until(&mut n, &mut timers, 2000);
        assert_eq!(n.get(id).unwrap().state, NotificationState::Hidden);
        run_until(&mut n, &mut timers, 2299);
        assert_eq!(n.get(id).unwrap().state, NotificationState::Hidden);
        run_until(&mut n, &mut timers, 2300);
        let done = n.get(id).unwrap();
        assert_eq!(done.state, NotificationState::Destroyed);
        assert_eq!(done.entered_at(NotificationState::Visible), Some(100));
        assert_eq!(done.entered_at(NotificationState::Destroyed), Some(2300));
        assert_eq!(timers.len(), 0);
    }

    #[test]
    fn overlapping_notifications_are_independent() {
        let mut n = Notifier::default();
        let mut timers = TimerQueue::new();
        let first = n.show(NotificationKind::Success, &mut timers);
        run_until(&mut n, &mut timers, 500);
        let second = n.show(NotificationKind::Failure, &mut timers);
        assert_eq!(n.live().count(), 2);
        run_until(&mut n, &mut timers, 2300);
        assert_eq!(n.get(first).unwrap().state, NotificationState::Destroyed);
        assert_eq!(n.get(second).unwrap().state, NotificationState::Visible);
        run_until(&mut n, &mut timers, 2800);
        assert_eq!(n.live().count(), 0);
        assert_eq!(n.count(NotificationKind::Success), 1);
        assert_eq!(n.count(NotificationKind::Failure), 1);
    }
}
